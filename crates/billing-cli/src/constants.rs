//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure, including store read/write errors.
    pub const GENERAL: i32 = 1;

    /// Resource not found (snapshot id, backup file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Backup document is not valid JSON or lacks a `data` object.
    pub const INVALID_BACKUP: i32 = 5;

    /// Snapshot storage could not be opened.
    pub const STORAGE_UNAVAILABLE: i32 = 6;
}

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BILLING_CONFIG";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "BILLING_LOG";

/// Directory name under the XDG config/data roots.
pub const APP_DIR: &str = "billing";
