//! Application state shared across handlers.

use attribution::UtmDefaults;
use guard::{CounterStore, MemoryCounterStore, RateLimiter, RateTiers};
use std::sync::Arc;
use std::time::Duration;
use store_client::{EventStore, InquiryNotifier, TourCatalog};
use telemetry::metrics;
use tracing::debug;

/// Purge interval for expired rate windows (5 minutes).
const COUNTER_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Tour catalog reads (cached REST client in production, mock in tests)
    pub catalog: Arc<dyn TourCatalog>,
    /// Click and inquiry writes
    pub events: Arc<dyn EventStore>,
    /// Outbound lead notifications
    pub notifier: Arc<dyn InquiryNotifier>,
    /// Fixed-window rate limiter
    pub limiter: Arc<RateLimiter>,
    /// UTM fallbacks for outbound redirect URLs
    pub utm: UtmDefaults,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn TourCatalog>,
        events: Arc<dyn EventStore>,
        notifier: Arc<dyn InquiryNotifier>,
        tiers: RateTiers,
        utm: UtmDefaults,
    ) -> Self {
        Self::with_counter_store(
            catalog,
            events,
            notifier,
            Arc::new(MemoryCounterStore::new()),
            tiers,
            utm,
        )
    }

    /// Create with a custom counter store, e.g. one shared across
    /// gateway instances.
    pub fn with_counter_store(
        catalog: Arc<dyn TourCatalog>,
        events: Arc<dyn EventStore>,
        notifier: Arc<dyn InquiryNotifier>,
        counters: Arc<dyn CounterStore>,
        tiers: RateTiers,
        utm: UtmDefaults,
    ) -> Self {
        Self {
            catalog,
            events,
            notifier,
            limiter: Arc::new(RateLimiter::new(counters, tiers)),
            utm,
        }
    }

    /// Start the counter purge background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_counter_purge(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(COUNTER_PURGE_INTERVAL);
            loop {
                interval.tick().await;
                let live = limiter.purge_expired().await;
                metrics().counter_windows.set(live as u64);
                debug!(live_windows = live, "purged expired rate windows");
            }
        })
    }
}
