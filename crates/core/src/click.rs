//! Click event emitted on every affiliate redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only attribution record for a single `/out/{slug}` redirect.
///
/// Written synchronously before the redirect response is sent; never
/// mutated or deleted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub tour_slug: String,
    pub tour_id: Uuid,
    /// Fully attributed URL the client was sent to.
    pub redirect_url: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    /// `_aff` token joining this click to later inquiries.
    pub cookie_id: String,
    pub occurred_at: DateTime<Utc>,
}
