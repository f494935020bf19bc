//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Success response for an accepted inquiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct InquiryAccepted {
    pub ok: bool,
    pub id: Uuid,
}

impl InquiryAccepted {
    pub fn new(id: Uuid) -> Self {
        Self { ok: true, id }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store_connected: bool,
    pub notifier_healthy: bool,
    pub tracked_windows: u64,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = if details.is_empty() {
            None
        } else {
            Some(details)
        };
        self
    }
}

/// API error type mapped onto HTTP at the pipeline boundary.
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
    pub retry_after: Option<u64>,
}

impl ApiError {
    fn plain(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::new(msg),
            retry_after: None,
        }
    }

    pub fn validation(details: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::new("Validation failed").with_details(details),
            retry_after: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: ErrorBody::new("Too many requests")
                .with_details(vec![format!("retry after {retry_after}s")]),
            retry_after: Some(retry_after),
        }
    }

    pub fn not_found() -> Self {
        Self::plain(StatusCode::NOT_FOUND, "Not found")
    }

    pub fn unavailable() -> Self {
        Self::plain(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable",
        )
    }

    pub fn internal() -> Self {
        Self::plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();

        // Add Retry-After header for rate limit responses
        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

impl From<gateway_core::Error> for ApiError {
    fn from(err: gateway_core::Error) -> Self {
        use gateway_core::Error;
        match err {
            Error::Validation { details, .. } => ApiError::validation(details),
            // The caller sees a plain validation failure; the matched
            // category stays in server-side logs.
            Error::ThreatDetected { .. } => ApiError::validation(Vec::new()),
            Error::RateLimited { retry_after_secs } => ApiError::rate_limited(retry_after_secs),
            Error::NotFound(what) => {
                debug!(what = %what, "resource not found");
                ApiError::not_found()
            }
            Error::Upstream(detail) => {
                warn!(detail = %detail, "upstream unavailable");
                ApiError::unavailable()
            }
            Error::Serialization(e) => ApiError::validation(vec![format!("body: {e}")]),
            Error::Internal(detail) => {
                error!(detail = %detail, "internal error");
                ApiError::internal()
            }
        }
    }
}
