//! Application-level utilities for the Billing CLI.
//!
//! This module provides:
//! - Path resolution for config, store and snapshot files
//! - The per-invocation application context

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::{missing_document_error, resolve_config_path};
