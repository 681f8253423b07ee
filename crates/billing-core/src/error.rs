//! Error types for billing core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps them to
//! short user-facing messages via [`BillingError::code`].

use thiserror::Error;

/// Result type alias for billing operations.
pub type Result<T> = std::result::Result<T, BillingError>;

/// Core error type for billing operations.
#[derive(Debug, Clone, Error)]
pub enum BillingError {
    /// Document bytes are not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Parsed document does not carry a `data` mapping
    #[error("Invalid backup format: {0}")]
    InvalidFormat(String),

    /// Snapshot id absent from the snapshot store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Snapshot store could not be opened
    #[error("Snapshot storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BillingError {
    /// Short, stable identifier suitable for user-facing feedback.
    pub fn code(&self) -> &'static str {
        match self {
            BillingError::InvalidJson(_) => "invalid-json",
            BillingError::InvalidFormat(_) => "missing-data",
            BillingError::NotFound(_) => "not-found",
            BillingError::StorageUnavailable(_) => "storage-unavailable",
            BillingError::Storage(_) => "storage",
            BillingError::InvalidInput(_) => "invalid-input",
        }
    }
}

impl From<std::io::Error> for BillingError {
    fn from(err: std::io::Error) -> Self {
        BillingError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BillingError {
    fn from(err: serde_json::Error) -> Self {
        BillingError::InvalidJson(err.to_string())
    }
}
