//! REST table client for the promotion tracker.

pub mod client;
pub mod config;
pub mod health;
pub mod insert;

pub use client::*;
pub use config::*;
pub use insert::*;
