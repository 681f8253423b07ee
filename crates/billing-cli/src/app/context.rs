//! Application context for the Billing CLI.
//!
//! Provides a unified context that combines CLI arguments with
//! lazily-loaded configuration and stores.

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use billing_core::backup::BackupManager;
use billing_core::store::FileStore;

use crate::cli::Cli;
use crate::config::BillingConfig;
use crate::ui::UiContext;

use super::resolver::load_config;

/// Application context that bundles CLI args with configuration.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<BillingConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// UI context for a command's stdout output.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json)
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&BillingConfig> {
        self.config.get_or_try_init(load_config)
    }

    /// Store path given on the command line or via `BILLING_STORE`, if any.
    pub fn cli_store_path(&self) -> Option<PathBuf> {
        self.cli
            .store
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        match self.cli_store_path() {
            Some(path) => Ok(path),
            None => Ok(PathBuf::from(&self.config()?.store.path)),
        }
    }

    pub fn snapshots_path(&self) -> anyhow::Result<PathBuf> {
        Ok(PathBuf::from(&self.config()?.snapshots.path))
    }

    /// Export directory: explicit argument, then config, then cwd.
    pub fn export_dir(&self, explicit: Option<&str>) -> anyhow::Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(PathBuf::from(dir));
        }
        Ok(self
            .config()?
            .export
            .dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(".").to_path_buf()))
    }

    /// Open the primary key-value store.
    pub fn open_store(&self) -> anyhow::Result<FileStore> {
        let path = self.store_path()?;
        Ok(FileStore::open(&path)?)
    }

    /// Open the store together with the snapshot database.
    pub async fn backups(&self) -> anyhow::Result<BackupManager<FileStore>> {
        let store = self.open_store()?;
        let snapshots_path = self.snapshots_path()?;
        Ok(BackupManager::connect(store, &snapshots_path).await)
    }
}
