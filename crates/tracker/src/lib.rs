//! Event tracker for promotion analytics.
//!
//! Every operation here is best-effort: failures are logged and counted,
//! never returned to the caller as an error.

pub mod config;
pub mod promotion;
pub mod tracker;

pub use self::config::*;
pub use promotion::*;
pub use tracker::*;
