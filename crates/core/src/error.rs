//! Unified error types for the tour gateway.
//!
//! One taxonomy shared by every crate in the workspace. Components
//! return these through their contracts; the API layer maps each
//! variant to an HTTP response at the pipeline boundary:
//! - `Validation`     400, per-field details included
//! - `ThreatDetected` 400 to the caller, logged at warn server-side
//! - `RateLimited`    429 with a Retry-After hint
//! - `NotFound`       404
//! - `Upstream`       503
//! - `Internal`       500, generic message to the client only

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the tour gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// Request shape or format validation failed.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        /// Per-field messages, safe to return to the caller.
        details: Vec<String>,
    },

    /// A threat signature matched a hard-gated field.
    ///
    /// Callers see this as a plain validation failure; the matched
    /// category and field name stay in server-side logs.
    #[error("threat detected in `{field}`: {category}")]
    ThreatDetected {
        category: &'static str,
        field: String,
    },

    /// Per-key quota exhausted for the current window.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Unknown slug, or a tour that cannot be redirected.
    #[error("not found: {0}")]
    NotFound(String),

    /// The persistent store or another upstream is unreachable.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error with a single detail message.
    pub fn validation(msg: impl Into<String>) -> Self {
        let message = msg.into();
        Self::Validation {
            details: vec![message.clone()],
            message,
        }
    }

    /// Create a validation error carrying per-field details.
    pub fn validation_details(msg: impl Into<String>, details: Vec<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            details,
        }
    }

    pub fn threat(category: &'static str, field: impl Into<String>) -> Self {
        Self::ThreatDetected {
            category,
            field: field.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::ThreatDetected { .. } => 400,
            Self::RateLimited { .. } => 429,
            Self::NotFound(_) => 404,
            Self::Upstream(_) => 503,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Whether this error marks the request as adversarial rather than
    /// merely malformed. Drives log severity at the pipeline boundary.
    pub fn is_adversarial(&self) -> bool {
        matches!(self, Self::ThreatDetected { .. })
    }
}
