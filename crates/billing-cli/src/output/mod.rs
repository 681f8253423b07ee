//! Output formatting helpers for the CLI.
//!
//! Snapshots, ledger entries and summaries are rendered either as JSON
//! or through the UI primitives (tables, key-value lines).

mod json;
mod text;

pub use json::{entries_json, import_report_json, snapshots_json, summary_json};
pub use text::{entry_list, import_items, snapshot_list, summary};
