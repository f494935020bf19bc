//! API routes.

pub mod health;
pub mod inquiries;
pub mod redirect;

use axum::{
    routing::{get, post},
    Router,
};
use telemetry::metrics;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use gateway_core::{Error, Result};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/out/:slug", get(redirect::redirect_handler))
        .route("/api/inquiries", post(inquiries::inquiry_handler))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Hard gate for fields with no legitimate use for code-like content.
///
/// A signature match rejects the whole request. The caller sees a
/// plain validation failure; the category and field land in the log.
pub(crate) fn scan_gated_field(field: &str, value: &str) -> Result<()> {
    if let Some(hit) = guard::detect(value) {
        metrics().threats_blocked.inc();
        warn!(
            field = %field,
            category = hit.category.as_str(),
            severity = hit.severity.as_str(),
            "threat signature matched in gated field"
        );
        return Err(Error::threat(hit.category.as_str(), field));
    }
    Ok(())
}
