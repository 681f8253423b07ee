//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use billing_core::BillingError;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (snapshot id, file)
    NotFound { message: String, hint: String },

    /// Backup document rejected before any write
    InvalidBackup(String),

    /// Snapshot storage unavailable in this environment
    StorageUnavailable(String),

    /// Invalid user input
    InvalidInput(String),

    /// Store read or write failure
    Storage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::InvalidBackup(message) => write!(f, "Import failed: {}", message),
            CliError::StorageUnavailable(message) => write!(f, "{}", message),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Storage(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidBackup(_) => exit_codes::INVALID_BACKUP,
            CliError::StorageUnavailable(_) => exit_codes::STORAGE_UNAVAILABLE,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Storage(_) => exit_codes::GENERAL,
        }
    }
}

impl From<BillingError> for CliError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NotFound(what) => CliError::not_found(
                format!("No {} in local snapshots", what),
                "Run `billing snapshot list` to see available snapshots.",
            ),
            BillingError::InvalidJson(_) | BillingError::InvalidFormat(_) => {
                CliError::InvalidBackup(err.code().to_string())
            }
            BillingError::StorageUnavailable(message) => CliError::StorageUnavailable(format!(
                "Local snapshots are unavailable: {}",
                message
            )),
            BillingError::Storage(message) => CliError::Storage(message),
            BillingError::InvalidInput(message) => CliError::InvalidInput(message),
        }
    }
}
