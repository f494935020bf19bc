//! Request defense for the tour gateway: threat signatures, a
//! detector over them, free-text sanitization, and the fixed-window
//! rate limiter.

pub mod detector;
pub mod limiter;
pub mod sanitize;
pub mod signatures;

pub use detector::{detect, ThreatMatch};
pub use limiter::{
    Acquired, ClientKey, CounterStore, Decision, MemoryCounterStore, RateLimiter, RateTiers, Tier,
    TierLimit,
};
pub use sanitize::sanitize;
pub use signatures::{signatures, Severity, Signature, ThreatCategory};
