//! JSON output formatting.

use serde_json::{json, Value};

use billing_core::backup::{ImportReport, Snapshot};
use billing_core::ledger::{LedgerEntry, Summary};

/// Snapshot listing row; the data payload is summarized by its captured keys.
pub fn snapshot_json(snapshot: &Snapshot) -> Value {
    let captured: Vec<&String> = snapshot
        .data
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, _)| key)
        .collect();
    json!({
        "id": snapshot.id,
        "createdAt": snapshot.meta.created_at,
        "app": snapshot.meta.app_name,
        "version": snapshot.meta.schema_version,
        "keys": captured,
    })
}

pub fn snapshots_json(snapshots: &[Snapshot]) -> Value {
    Value::Array(snapshots.iter().map(snapshot_json).collect())
}

pub fn entries_json(entries: &[&LedgerEntry]) -> Value {
    json!(entries)
}

pub fn summary_json(summary: &Summary, entries: usize) -> Value {
    json!({
        "income": summary.income,
        "expense": summary.expense,
        "balance": summary.balance,
        "entries": entries,
    })
}

pub fn import_report_json(report: &ImportReport) -> Value {
    json!({
        "written": report.written,
        "skipped": report.skipped,
        "failed": report.failed,
    })
}
