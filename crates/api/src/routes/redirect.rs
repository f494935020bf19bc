//! Affiliate redirect endpoint handler.
//!
//! `GET /out/{slug}` sends the visitor to the tour's partner booking
//! page with merged UTM attribution, a durable `_aff` identity, and a
//! click record written before the response leaves.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use telemetry::metrics;
use tracing::{info, warn};

use attribution::{build_redirect_url, ensure_token};
use gateway_core::limits::{MAX_USER_AGENT_LEN, MAX_UTM_LEN};
use gateway_core::validate::is_valid_slug;
use gateway_core::{ClickEvent, Error};
use guard::{sanitize, ClientKey, Decision, Tier};

use crate::extractors::{AffCookie, ClientIp};
use crate::response::ApiError;
use crate::routes::scan_gated_field;
use crate::state::AppState;

/// GET /out/:slug - Attributed redirect to the tour's partner page.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    client_ip: ClientIp,
    AffCookie(presented): AffCookie,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let start = Instant::now();

    // Shape checks come first so malformed junk is rejected without
    // consuming quota or touching the store.
    if !is_valid_slug(&slug) {
        return Err(Error::validation(
            "tour_slug: must be lowercase letters, digits, and hyphens",
        )
        .into());
    }
    for (key, value) in &query {
        if key.starts_with("utm_") && value.chars().count() > MAX_UTM_LEN {
            return Err(Error::validation(format!(
                "{key}: must be at most {MAX_UTM_LEN} characters"
            ))
            .into());
        }
    }

    // Quota is scoped per tour so one hot link cannot starve the rest
    // of the site for the same visitor.
    let key = ClientKey::new(Tier::Redirect, client_ip.key()).with_sub_key(slug.as_str());
    if let Decision::Deny { retry_after_secs } = state.limiter.check(&key).await {
        metrics().rate_limited_requests.inc();
        warn!(ip = %client_ip.key(), slug = %slug, "redirect rate limit exceeded");
        return Err(Error::rate_limited(retry_after_secs).into());
    }

    // UTM values flow into the outbound URL verbatim, so code-like
    // payloads are rejected outright.
    for (key, value) in &query {
        if key.starts_with("utm_") {
            scan_gated_field(key, value)?;
        }
    }

    // Resolve the tour, the visitor identity, and the outbound URL.
    let tour = state
        .catalog
        .tour_detail(&slug)
        .await?
        .ok_or_else(|| Error::not_found(format!("tour `{slug}`")))?;
    let affiliate_url = tour.affiliate_url()?;
    let token = ensure_token(presented.as_deref());
    let location = build_redirect_url(affiliate_url, &slug, &query, &state.utm)?;

    // Record the click before responding. Losing the write costs an
    // attribution row, not a booking, so the redirect still goes out.
    let click = ClickEvent {
        tour_slug: slug.clone(),
        tour_id: tour.id,
        redirect_url: location.clone(),
        user_agent: bounded_user_agent(&headers),
        ip_address: client_ip.0.as_deref().map(|ip| sanitize(ip).into_owned()),
        cookie_id: token.value().to_string(),
        occurred_at: chrono::Utc::now(),
    };
    let write_start = Instant::now();
    match state.events.insert_click(&click).await {
        Ok(()) => {
            metrics()
                .store_write_latency_ms
                .observe(write_start.elapsed().as_millis() as u64);
            metrics().clicks_recorded.inc();
        }
        Err(e) => {
            metrics().click_write_failures.inc();
            warn!(slug = %slug, error = %e, "click write failed, issuing redirect anyway");
        }
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&location)
            .map_err(|e| Error::internal(format!("redirect URL rejected as header value: {e}")))?,
    );
    response_headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    if let Some(cookie) = token.set_cookie() {
        response_headers.insert(
            header::SET_COOKIE,
            HeaderValue::from_str(&cookie)
                .map_err(|e| Error::internal(format!("cookie rejected as header value: {e}")))?,
        );
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().redirects_served.inc();
    metrics().redirect_latency_ms.observe(latency_ms);

    info!(
        slug = %slug,
        new_visitor = token.is_new(),
        latency_ms = latency_ms,
        "Redirect served"
    );

    Ok((StatusCode::FOUND, response_headers).into_response())
}

/// User agent string, capped and sanitized before it is persisted.
fn bounded_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|ua| {
            let bounded: String = ua.chars().take(MAX_USER_AGENT_LEN).collect();
            sanitize(&bounded).into_owned()
        })
}
