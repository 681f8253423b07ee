//! Ledger normalization.
//!
//! The `accounts` key has held two shapes over time:
//!
//! - legacy: an array of records, each carrying an optional `type`
//! - current: `{ "income": [...], "expense": [...] }`, kind implied by group
//!
//! [`normalize`] accepts either and yields one canonical list. The raw value
//! is only read, never rewritten.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::types::{EntryKind, EntrySource, LedgerEntry};

/// Normalize a raw stored ledger into canonical entries.
///
/// Legacy arrays keep their order. Current-shape objects yield all `income`
/// records before all `expense` records. Anything else is an empty ledger.
pub fn normalize(raw: &Value) -> Vec<LedgerEntry> {
    match raw {
        Value::Array(records) => records.iter().map(legacy_entry).collect(),
        Value::Object(groups) => {
            let income = group(groups.get("income")).map(income_entry);
            let expense = group(groups.get("expense")).map(expense_entry);
            income.chain(expense).collect()
        }
        _ => Vec::new(),
    }
}

fn group(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|records| records.iter())
        .into_iter()
        .flatten()
}

fn legacy_entry(record: &Value) -> LedgerEntry {
    let kind = match text_field(record, "type").as_deref() {
        Some("expense") => EntryKind::Expense,
        _ => EntryKind::Income,
    };
    let source = match text_field(record, "source").as_deref() {
        Some("bill") => EntrySource::Bill,
        _ => EntrySource::Manual,
    };

    LedgerEntry {
        id: id_or_new(record),
        kind,
        source,
        amount: coerce_amount(record.get("amount")),
        note: text_field(record, "note").unwrap_or_default(),
        bill_ref: bill_ref(record, source),
        occurred_at: date_or_now(record),
    }
}

fn income_entry(record: &Value) -> LedgerEntry {
    let source = match text_field(record, "source").as_deref() {
        Some("manual") => EntrySource::Manual,
        _ => EntrySource::Bill,
    };
    let reference = text_field(record, "ref");
    let note = text_field(record, "note").unwrap_or_else(|| {
        format!("Bill {}", reference.as_deref().unwrap_or(""))
            .trim_end()
            .to_string()
    });

    LedgerEntry {
        id: id_or_new(record),
        kind: EntryKind::Income,
        source,
        amount: coerce_amount(record.get("amount")),
        note,
        bill_ref: bill_ref(record, source),
        occurred_at: date_or_now(record),
    }
}

fn expense_entry(record: &Value) -> LedgerEntry {
    let note = text_field(record, "note")
        .or_else(|| text_field(record, "category"))
        .unwrap_or_else(|| "Expense".to_string());

    LedgerEntry {
        id: id_or_new(record),
        kind: EntryKind::Expense,
        source: EntrySource::Manual,
        amount: coerce_amount(record.get("amount")),
        note,
        bill_ref: None,
        occurred_at: date_or_now(record),
    }
}

fn bill_ref(record: &Value, source: EntrySource) -> Option<String> {
    match source {
        EntrySource::Bill => text_field(record, "ref"),
        EntrySource::Manual => None,
    }
}

/// Non-empty string (or number, rendered) under `field`.
fn text_field(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_or_new(record: &Value) -> String {
    text_field(record, "id").unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn date_or_now(record: &Value) -> String {
    text_field(record, "date")
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Coerce a loosely-typed amount into a finite, non-negative number.
///
/// Follows `Number(x) || 0` for numbers, numeric strings, booleans and null,
/// including `0x`/`0X` hex strings. Spellings of infinity or NaN read as zero,
/// as do negative results.
pub(crate) fn coerce_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_amount(s.trim()),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn parse_amount(text: &str) -> f64 {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(0.0, |n| n as f64);
    }
    // Rust also accepts "inf" and "nan" here
    let numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if text.is_empty() || !numeric {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(0.0)
}
