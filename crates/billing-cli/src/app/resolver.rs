//! Path resolution for config, store and snapshot files.

use std::path::{Path, PathBuf};

use crate::config::{default_config_path, read_config, BillingConfig};
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

/// Resolve the config file path, checking BILLING_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, or defaults when none exists.
pub fn load_config() -> anyhow::Result<BillingConfig> {
    let config_path = resolve_config_path()?;
    if config_path.exists() {
        return read_config(&config_path);
    }
    tracing::debug!(path = %config_path.display(), "no config file; using defaults");
    BillingConfig::defaults()
}

/// Error for a backup document path that does not exist.
pub fn missing_document_error(path: &Path) -> CliError {
    CliError::not_found(
        format!("No backup document at {}", path.display()),
        "Create one with:\n  billing export --dir <DIR>",
    )
}
