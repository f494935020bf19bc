//! Tour catalog types consumed from the hosted data store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tour detail as served by the catalog API.
///
/// Only the fields the gateway acts on; the store returns more and
/// serde drops the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDetail {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    /// Partner booking URL. Tours without one cannot be redirected.
    pub affiliate_url: Option<String>,
}

impl TourDetail {
    /// The affiliate URL, or a not-found error when the tour has none.
    ///
    /// A tour without a partner link is indistinguishable from an
    /// unknown slug to redirect callers.
    pub fn affiliate_url(&self) -> crate::Result<&str> {
        self.affiliate_url
            .as_deref()
            .ok_or_else(|| crate::Error::not_found(format!("tour `{}` has no affiliate URL", self.slug)))
    }
}
