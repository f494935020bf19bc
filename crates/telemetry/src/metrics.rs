//! In-process metrics.
//!
//! Atomic counters, gauges, and latency histograms for the request
//! pipeline. A snapshot is logged periodically from the main loop; no
//! external metrics system is involved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 2ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 1s, 5s
    ///
    /// A redirect is a cache read plus one store write, so the mass
    /// sits well under 100ms; the top buckets catch store timeouts.
    buckets: [AtomicU64; 10],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 10] = [1, 2, 5, 10, 25, 50, 100, 250, 1000, 5000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[9].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the tour gateway.
#[derive(Debug, Default)]
pub struct Metrics {
    // Redirect path
    pub redirects_served: Counter,
    pub clicks_recorded: Counter,
    pub click_write_failures: Counter,

    // Inquiry path
    pub inquiries_accepted: Counter,
    pub inquiries_rejected: Counter,
    pub notify_failures: Counter,

    // Request defense
    pub threats_blocked: Counter,
    pub threats_flagged: Counter,
    pub rate_limited_requests: Counter,
    pub limiter_fail_open: Counter,

    // Latency histograms
    pub redirect_latency_ms: Histogram,
    pub inquiry_latency_ms: Histogram,
    pub store_write_latency_ms: Histogram,

    // Gauges
    pub counter_windows: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub redirects_served: u64,
    pub clicks_recorded: u64,
    pub click_write_failures: u64,
    pub inquiries_accepted: u64,
    pub inquiries_rejected: u64,
    pub notify_failures: u64,
    pub threats_blocked: u64,
    pub threats_flagged: u64,
    pub rate_limited_requests: u64,
    pub limiter_fail_open: u64,
    pub redirect_latency_mean_ms: f64,
    pub inquiry_latency_mean_ms: f64,
    pub store_write_latency_mean_ms: f64,
    pub counter_windows: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            redirects_served: self.redirects_served.get(),
            clicks_recorded: self.clicks_recorded.get(),
            click_write_failures: self.click_write_failures.get(),
            inquiries_accepted: self.inquiries_accepted.get(),
            inquiries_rejected: self.inquiries_rejected.get(),
            notify_failures: self.notify_failures.get(),
            threats_blocked: self.threats_blocked.get(),
            threats_flagged: self.threats_flagged.get(),
            rate_limited_requests: self.rate_limited_requests.get(),
            limiter_fail_open: self.limiter_fail_open.get(),
            redirect_latency_mean_ms: self.redirect_latency_ms.mean(),
            inquiry_latency_mean_ms: self.inquiry_latency_ms.mean(),
            store_write_latency_mean_ms: self.store_write_latency_ms.mean(),
            counter_windows: self.counter_windows.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
