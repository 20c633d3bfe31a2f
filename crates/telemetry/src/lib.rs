//! Telemetry for the promotion tracker.
//!
//! Structured logs go through `tracing`; counters and latency histograms
//! stay in process and are logged as a snapshot on shutdown.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
