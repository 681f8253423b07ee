//! # Billing Core
//!
//! Core library for Billing - a small-business billing tool with a local
//! key-value store, an income/expense ledger, and snapshot backups.
//!
//! This crate provides the storage abstractions, ledger normalization and
//! backup/restore logic independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **store**: synchronous key-value store trait and implementations
//! - **ledger**: normalization of the two on-disk ledger shapes, totals
//! - **backup**: snapshot capture, import, and the asynchronous snapshot store

pub mod backup;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod store;

pub use error::{BillingError, Result};
pub use store::{KeyValueStore, KeyValueStoreExt};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
