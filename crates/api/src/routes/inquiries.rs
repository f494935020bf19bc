//! Inquiry submission endpoint handler.
//!
//! `POST /api/inquiries` runs the full defense pipeline on a booking
//! form submission: size gate, parse, shape validation, rate limit,
//! threat scan, sanitize, attribute, persist, notify.

use axum::{body::Bytes, extract::State, Json};
use std::time::Instant;
use telemetry::{health, metrics};
use tracing::{debug, info, warn};
use uuid::Uuid;

use gateway_core::validate::{is_valid_aff_token, validate_inquiry, validate_inquiry_size};
use gateway_core::{Error, InquiryPayload, InquiryRecord};
use guard::{detect, sanitize, ClientKey, Decision, Tier};

use crate::extractors::{AffCookie, ClientIp};
use crate::response::{ApiError, InquiryAccepted};
use crate::routes::scan_gated_field;
use crate::state::AppState;

/// POST /api/inquiries - Booking inquiry submission.
pub async fn inquiry_handler(
    State(state): State<AppState>,
    client_ip: ClientIp,
    AffCookie(cookie): AffCookie,
    body: Bytes,
) -> Result<Json<InquiryAccepted>, ApiError> {
    let start = Instant::now();

    // Check payload size before parsing
    validate_inquiry_size(&body).map_err(|e| {
        metrics().inquiries_rejected.inc();
        ApiError::from(e)
    })?;

    let payload: InquiryPayload = serde_json::from_slice(&body).map_err(|e| {
        metrics().inquiries_rejected.inc();
        debug!(error = %e, "inquiry body did not parse");
        ApiError::from(Error::from(e))
    })?;

    validate_inquiry(&payload).map_err(|e| {
        metrics().inquiries_rejected.inc();
        ApiError::from(e)
    })?;

    // One booking quota per visitor, across all tours.
    let key = ClientKey::new(Tier::Booking, client_ip.key());
    if let Decision::Deny { retry_after_secs } = state.limiter.check(&key).await {
        metrics().rate_limited_requests.inc();
        warn!(ip = %client_ip.key(), "booking rate limit exceeded");
        return Err(Error::rate_limited(retry_after_secs).into());
    }

    // Campaign fields end up in stored attribution columns and
    // outbound URLs; code-like content is rejected. Free text is only
    // ever sanitized.
    for (field, value) in [
        ("utm_source", payload.utm_source.as_deref()),
        ("utm_medium", payload.utm_medium.as_deref()),
        ("utm_campaign", payload.utm_campaign.as_deref()),
    ] {
        if let Some(value) = value {
            scan_gated_field(field, value)?;
        }
    }

    let record = InquiryRecord {
        id: Uuid::new_v4(),
        tour_id: payload.tour_id,
        tour_slug: payload.tour_slug.clone(),
        name: sanitize_free_text("name", &payload.name),
        email: payload.email.clone(),
        phone: payload.phone.clone(),
        message: sanitize_free_text("message", &payload.message),
        travel_date: payload.travel_date_parsed(),
        group_size: payload.group_size,
        utm_source: payload.utm_source.clone(),
        utm_medium: payload.utm_medium.clone(),
        utm_campaign: payload.utm_campaign.clone(),
        affiliate_cookie_id: resolve_attribution(
            cookie.as_deref(),
            payload.affiliate_cookie.as_deref(),
        ),
        created_at: chrono::Utc::now(),
    };

    // Persist before acknowledging; the caller's 200 means the lead
    // is durable.
    let write_start = Instant::now();
    state.events.insert_inquiry(&record).await?;
    metrics()
        .store_write_latency_ms
        .observe(write_start.elapsed().as_millis() as u64);

    // Notify after persist; a dead webhook never fails a lead.
    let notifier = state.notifier.clone();
    let notify_record = record.clone();
    tokio::spawn(async move {
        match notifier.notify_inquiry(&notify_record).await {
            Ok(()) => health().notifier.set_healthy(),
            Err(e) => {
                metrics().notify_failures.inc();
                health().notifier.set_unhealthy(e.to_string());
                warn!(inquiry_id = %notify_record.id, error = %e, "inquiry notification failed");
            }
        }
    });

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().inquiries_accepted.inc();
    metrics().inquiry_latency_ms.observe(latency_ms);

    info!(
        inquiry_id = %record.id,
        tour_slug = %record.tour_slug,
        attributed = record.affiliate_cookie_id.is_some(),
        latency_ms = latency_ms,
        "Inquiry accepted"
    );

    Ok(Json(InquiryAccepted::new(record.id)))
}

/// Free text is never rejected for content; a signature hit is logged
/// and the stored value is the sanitized form either way.
fn sanitize_free_text(field: &'static str, value: &str) -> String {
    if let Some(hit) = detect(value) {
        metrics().threats_flagged.inc();
        warn!(
            field = field,
            category = hit.category.as_str(),
            severity = hit.severity.as_str(),
            "threat signature in free text, storing sanitized form"
        );
    }
    sanitize(value).into_owned()
}

/// The HttpOnly cookie is the authoritative identity; the body field
/// exists for non-browser clients. Malformed values read as absent so
/// attacker-shaped junk never becomes a join key.
fn resolve_attribution(cookie: Option<&str>, body_field: Option<&str>) -> Option<String> {
    cookie
        .filter(|t| is_valid_aff_token(t))
        .or_else(|| body_field.filter(|t| is_valid_aff_token(t)))
        .map(str::to_string)
}
