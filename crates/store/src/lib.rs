//! Client for the hosted data store behind the gateway.
//!
//! Every external collaborator is an injectable trait so handlers can
//! run against in-memory doubles in tests and the REST client in
//! production.

pub mod cache;
pub mod client;
pub mod config;
pub mod health;
pub mod notify;

use async_trait::async_trait;

use gateway_core::{ClickEvent, InquiryRecord, Result, TourDetail};

pub use cache::CachedCatalog;
pub use client::RestStore;
pub use config::StoreConfig;
pub use notify::{NotificationChannel, Notifier, NotifyConfig};

/// Read access to the tour catalog.
#[async_trait]
pub trait TourCatalog: Send + Sync {
    /// Look up one tour by slug. `Ok(None)` is an unknown slug.
    async fn tour_detail(&self, slug: &str) -> Result<Option<TourDetail>>;
}

/// Append access to the inquiry and click tables.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert_inquiry(&self, record: &InquiryRecord) -> Result<()>;

    async fn insert_click(&self, event: &ClickEvent) -> Result<()>;
}

/// Outbound admin notification for a new lead.
#[async_trait]
pub trait InquiryNotifier: Send + Sync {
    async fn notify_inquiry(&self, record: &InquiryRecord) -> Result<()>;
}
