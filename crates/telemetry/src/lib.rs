//! Internal telemetry for the tour gateway.
//!
//! In-process counters and health state, plus tracing setup. Metrics
//! never leave the process; the main loop logs a snapshot on an
//! interval.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
