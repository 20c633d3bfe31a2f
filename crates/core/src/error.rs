//! Unified error types for the promotion tracker.
//!
//! Error codes:
//! - TRACK_001: Validation errors (missing or empty required field)
//! - STORE_001: Transport failure (request never got a response)
//! - STORE_002: Storage rejection (backend answered with a non-2xx status)

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// TRACK_001: Required field missing or empty
    MissingField,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "TRACK_001",
        }
    }
}

/// Store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// STORE_001: Backend unreachable, timed out, or connection dropped
    Transport,
    /// STORE_002: Backend refused the insert
    Rejected,
}

impl StoreErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport => "STORE_001",
            Self::Rejected => "STORE_002",
        }
    }
}

/// Unified error type for the promotion tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error with code.
    #[error("[{code}] {message}")]
    Validation { code: &'static str, message: String },

    /// Transport or storage error with code.
    #[error("[{code}] {message}")]
    Store {
        code: &'static str,
        message: String,
        /// HTTP status returned by the backend, if it answered at all
        status: Option<u16>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::Validation {
            code: code.code(),
            message: msg.into(),
        }
    }

    /// Create a missing-field validation error.
    pub fn missing_field(field: &str) -> Self {
        Self::validation(
            ValidationErrorCode::MissingField,
            format!("missing required field: {}", field),
        )
    }

    /// Create a transport error (no response from the backend).
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Store {
            code: StoreErrorCode::Transport.code(),
            message: msg.into(),
            status: None,
        }
    }

    /// Create a storage rejection error.
    pub fn rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::Store {
            code: StoreErrorCode::Rejected.code(),
            message: msg.into(),
            status: Some(status),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from the backend insert call.
    pub fn is_transport_or_storage(&self) -> bool {
        matches!(self, Self::Store { .. })
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation { code, .. } | Self::Store { code, .. } => Some(*code),
            _ => None,
        }
    }
}
