//! Text and table output formatting.

use billing_core::backup::{ImportReport, Snapshot};
use billing_core::ledger::{LedgerEntry, Summary};

use crate::ui::theme::signed;
use crate::ui::{hint, kv, money, table, Column, UiContext};

const SNAPSHOT_COLUMNS: [Column; 3] = [
    Column::text("ID"),
    Column::text("Created"),
    Column::numeric("Keys"),
];

const ENTRY_COLUMNS: [Column; 6] = [
    Column::text("Date"),
    Column::text("Kind"),
    Column::text("Source"),
    Column::numeric("Amount"),
    Column::text("Ref"),
    Column::text("Note"),
];

/// Render a snapshot listing, newest first.
pub fn snapshot_list(ctx: &UiContext, snapshots: &[Snapshot]) -> String {
    if snapshots.is_empty() {
        return if ctx.mode.is_pretty() {
            format!("No snapshots yet.\n{}", hint(ctx, "billing snapshot save"))
        } else {
            String::new()
        };
    }

    let rows: Vec<Vec<String>> = snapshots
        .iter()
        .map(|snapshot| {
            let captured = snapshot.data.values().filter(|v| !v.is_null()).count();
            vec![
                snapshot.id.clone(),
                snapshot.meta.created_at.to_rfc3339(),
                captured.to_string(),
            ]
        })
        .collect();
    table(ctx, &SNAPSHOT_COLUMNS, &rows)
}

/// Render ledger entries in their stored order.
pub fn entry_list(ctx: &UiContext, entries: &[&LedgerEntry]) -> String {
    if entries.is_empty() {
        return if ctx.mode.is_pretty() {
            "No ledger entries.".to_string()
        } else {
            String::new()
        };
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry_date(entry),
                entry.kind.to_string(),
                entry.source.to_string(),
                money(entry.amount),
                entry.bill_ref.clone().unwrap_or_default(),
                entry.note.clone(),
            ]
        })
        .collect();
    table(ctx, &ENTRY_COLUMNS, &rows)
}

/// Render income, expense and balance.
pub fn summary(ctx: &UiContext, summary: &Summary, entries: usize) -> String {
    let balance = signed(&money(summary.balance), summary.balance < 0.0, ctx.color);
    [
        kv(ctx, "Income", &money(summary.income)),
        kv(ctx, "Expense", &money(summary.expense)),
        kv(ctx, "Balance", &balance),
        kv(ctx, "Entries", &entries.to_string()),
    ]
    .join("\n")
}

/// Key-value items describing an import outcome.
pub fn import_items(report: &ImportReport) -> Vec<(&'static str, String)> {
    let mut items = vec![
        ("Written", report.written.len().to_string()),
        ("Skipped", report.skipped.len().to_string()),
    ];
    if !report.failed.is_empty() {
        items.push(("Failed", report.failed.join(",")));
    }
    items
}

fn entry_date(entry: &LedgerEntry) -> String {
    entry
        .occurred_at_utc()
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| entry.occurred_at.clone())
}
