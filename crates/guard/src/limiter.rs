//! Fixed-window rate limiting over an injectable counter store.
//!
//! The counter store is the only contended resource in the gateway;
//! every concurrent request for the same key serializes through its
//! atomic increment-and-compare. Expired windows are superseded
//! lazily on the next acquire; the periodic purge is memory
//! reclamation only and never a correctness concern.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use telemetry::metrics;
use tracing::warn;

use gateway_core::{Error, Result};

/// Route class a request is limited under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Booking,
    Redirect,
    Default,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Redirect => "redirect",
            Self::Default => "default",
        }
    }
}

/// Quota for one tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierLimit {
    pub limit: u64,
    pub window_secs: u64,
}

/// Static tier table, validated once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTiers {
    pub booking: TierLimit,
    pub redirect: TierLimit,
    pub default: TierLimit,
}

impl Default for RateTiers {
    fn default() -> Self {
        Self {
            booking: TierLimit {
                limit: 10,
                window_secs: 60,
            },
            redirect: TierLimit {
                limit: 30,
                window_secs: 60,
            },
            default: TierLimit {
                limit: 60,
                window_secs: 60,
            },
        }
    }
}

impl RateTiers {
    pub fn limit_for(&self, tier: Tier) -> TierLimit {
        match tier {
            Tier::Booking => self.booking,
            Tier::Redirect => self.redirect,
            Tier::Default => self.default,
        }
    }

    /// Reject zero limits and zero-length windows before serving.
    pub fn validate(&self) -> Result<()> {
        for (name, tl) in [
            ("booking", self.booking),
            ("redirect", self.redirect),
            ("default", self.default),
        ] {
            if tl.limit == 0 {
                return Err(Error::internal(format!("rate tier `{name}`: limit must be >= 1")));
            }
            if tl.window_secs == 0 {
                return Err(Error::internal(format!(
                    "rate tier `{name}`: window_secs must be >= 1"
                )));
            }
        }
        Ok(())
    }
}

/// Composite rate-limit identity: tier + client IP, optionally a
/// route-specific resource. Recomputed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    tier: Tier,
    ip: String,
    sub_key: Option<String>,
}

impl ClientKey {
    pub fn new(tier: Tier, ip: impl Into<String>) -> Self {
        Self {
            tier,
            ip: ip.into(),
            sub_key: None,
        }
    }

    /// Scope the key to one resource, e.g. the tour slug on redirects.
    pub fn with_sub_key(mut self, sub_key: impl Into<String>) -> Self {
        self.sub_key = Some(sub_key.into());
        self
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Flat form used as the counter-store key.
    pub fn storage_key(&self) -> String {
        match &self.sub_key {
            Some(sub) => format!("{}:{}:{}", self.tier.as_str(), self.ip, sub),
            None => format!("{}:{}", self.tier.as_str(), self.ip),
        }
    }
}

/// Outcome of one atomic counter acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired {
    /// Whether the request fits inside the window's limit.
    pub admitted: bool,
    /// Post-acquire count; capped at the limit when refused.
    pub count: u64,
}

/// Shared counter store behind the rate limiter.
///
/// `try_acquire` must be atomic with respect to concurrent calls for
/// the same key: two requests racing on the last slot of a window must
/// never both be admitted.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn try_acquire(
        &self,
        key: &str,
        window_start: u64,
        window_secs: u64,
        limit: u64,
    ) -> Result<Acquired>;

    /// Drop windows that ended before `now_secs` and report how many
    /// remain. Memory reclamation only; lazy supersession already
    /// handles correctness.
    async fn purge(&self, now_secs: u64) -> usize {
        let _ = now_secs;
        0
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: u64,
    span_secs: u64,
    count: u64,
}

/// In-process counter store.
///
/// A single mutex over the window map makes increment-and-compare
/// atomic; the critical section is a map lookup and an integer
/// update.
#[derive(Default)]
pub struct MemoryCounterStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live windows, current and expired.
    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.lock().is_empty()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn try_acquire(
        &self,
        key: &str,
        window_start: u64,
        window_secs: u64,
        limit: u64,
    ) -> Result<Acquired> {
        let mut windows = self.windows.lock();
        let window = windows.entry(key.to_string()).or_insert(Window {
            start: window_start,
            span_secs: window_secs,
            count: 0,
        });

        // A stored window from another period is superseded, not
        // mutated.
        if window.start != window_start {
            *window = Window {
                start: window_start,
                span_secs: window_secs,
                count: 0,
            };
        }

        if window.count < limit {
            window.count += 1;
            Ok(Acquired {
                admitted: true,
                count: window.count,
            })
        } else {
            Ok(Acquired {
                admitted: false,
                count: window.count,
            })
        }
    }

    async fn purge(&self, now_secs: u64) -> usize {
        let mut windows = self.windows.lock();
        windows.retain(|_, w| w.start + w.span_secs > now_secs);
        windows.len()
    }
}

/// Decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { retry_after_secs: u64 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Fixed-window rate limiter.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    tiers: RateTiers,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, tiers: RateTiers) -> Self {
        Self { store, tiers }
    }

    pub fn tiers(&self) -> &RateTiers {
        &self.tiers
    }

    /// Check the current window for `key`.
    pub async fn check(&self, key: &ClientKey) -> Decision {
        self.check_at(key, Utc::now().timestamp().max(0) as u64).await
    }

    /// Check at an explicit clock reading.
    pub async fn check_at(&self, key: &ClientKey, now_secs: u64) -> Decision {
        let TierLimit { limit, window_secs } = self.tiers.limit_for(key.tier());
        let window_start = now_secs - (now_secs % window_secs);
        let storage_key = key.storage_key();

        match self
            .store
            .try_acquire(&storage_key, window_start, window_secs, limit)
            .await
        {
            Ok(acquired) if acquired.admitted => Decision::Allow,
            Ok(_) => Decision::Deny {
                retry_after_secs: window_start + window_secs - now_secs,
            },
            Err(e) => {
                // Counter store outage: fail open so the public
                // redirect keeps working, but make the degradation
                // visible.
                warn!(
                    key = %storage_key,
                    error = %e,
                    "counter store unreachable, admitting request unchecked"
                );
                metrics().limiter_fail_open.inc();
                Decision::Allow
            }
        }
    }

    /// Drop expired windows from the store; returns the live window
    /// count for gauge reporting.
    pub async fn purge_expired(&self) -> usize {
        self.store.purge(Utc::now().timestamp().max(0) as u64).await
    }
}
