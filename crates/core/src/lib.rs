//! Core types, session handling, and validation for the promotion tracker.

pub mod environment;
pub mod error;
pub mod events;
pub mod schema;
pub mod session;

pub use environment::*;
pub use error::{Error, Result};
pub use events::*;
pub use schema::*;
pub use session::*;
