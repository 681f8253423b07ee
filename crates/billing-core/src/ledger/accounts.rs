//! Reads and appends against the `accounts` key.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{BillingError, Result};
use crate::store::{KeyValueStore, KeyValueStoreExt};

use super::normalize::normalize;
use super::types::{EntryKind, LedgerEntry};

/// Store key holding the ledger.
pub const ACCOUNTS_KEY: &str = "accounts";

/// Current on-disk ledger shape. Records are kept as raw JSON so fields this
/// crate does not know about survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accounts {
    #[serde(default)]
    pub income: Vec<Value>,
    #[serde(default)]
    pub expense: Vec<Value>,
}

impl Accounts {
    /// Interpret any stored value as the current shape.
    ///
    /// Legacy arrays are split by their `type` field, with the legacy
    /// defaults (`source: "manual"`, empty `note`) written into each record.
    /// Missing or non-array groups become empty; every other value is an
    /// empty ledger.
    pub fn from_raw(raw: Value) -> Self {
        match raw {
            Value::Object(mut groups) => Self {
                income: take_group(groups.remove("income")),
                expense: take_group(groups.remove("expense")),
            },
            Value::Array(records) => {
                let (expense, income): (Vec<Value>, Vec<Value>) = records
                    .into_iter()
                    .map(with_legacy_defaults)
                    .partition(|r| r.get("type").and_then(Value::as_str) == Some("expense"));
                Self { income, expense }
            }
            _ => Self::default(),
        }
    }
}

fn take_group(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(records)) => records,
        _ => Vec::new(),
    }
}

fn with_legacy_defaults(mut record: Value) -> Value {
    if let Some(fields) = record.as_object_mut() {
        // legacy reads anything but "bill" as manual
        let is_bill = fields.get("source").and_then(Value::as_str) == Some("bill");
        if !is_bill {
            fields.insert("source".to_string(), json!("manual"));
        }
        fields.entry("note").or_insert_with(|| json!(""));
    }
    record
}

/// Current-shape view of the ledger. Never fails.
pub fn accounts<S: KeyValueStore + ?Sized>(store: &S) -> Accounts {
    Accounts::from_raw(store.load(ACCOUNTS_KEY, Value::Null))
}

/// Canonical entries for whatever shape the store currently holds.
pub fn load_entries<S: KeyValueStore + ?Sized>(store: &S) -> Vec<LedgerEntry> {
    normalize(&store.load(ACCOUNTS_KEY, Value::Null))
}

/// Record income from an issued bill. Returns the new record id.
///
/// # Errors
///
/// Returns `BillingError::InvalidInput` if `amount` is negative or not finite.
pub fn add_income_from_bill<S: KeyValueStore + ?Sized>(
    store: &S,
    bill_no: &str,
    amount: f64,
    note: Option<&str>,
) -> Result<String> {
    validate_amount(amount)?;
    let id = Uuid::new_v4().to_string();
    let mut record = json!({
        "id": id,
        "date": now_iso(),
        "amount": amount,
        "source": "bill",
        "ref": bill_no,
    });
    if let Some(note) = note.filter(|n| !n.is_empty()) {
        record["note"] = json!(note);
    }
    append(store, EntryKind::Income, record);
    tracing::debug!(id = %id, bill = bill_no, amount, "recorded bill income");
    Ok(id)
}

/// Record an expense. Returns the new record id.
///
/// # Errors
///
/// Returns `BillingError::InvalidInput` if `amount` is negative or not finite.
pub fn add_expense<S: KeyValueStore + ?Sized>(
    store: &S,
    amount: f64,
    category: Option<&str>,
    note: Option<&str>,
) -> Result<String> {
    validate_amount(amount)?;
    let id = Uuid::new_v4().to_string();
    let mut record = json!({
        "id": id,
        "date": now_iso(),
        "amount": amount,
    });
    if let Some(category) = category.filter(|c| !c.is_empty()) {
        record["category"] = json!(category);
    }
    if let Some(note) = note.filter(|n| !n.is_empty()) {
        record["note"] = json!(note);
    }
    append(store, EntryKind::Expense, record);
    tracing::debug!(id = %id, amount, "recorded expense");
    Ok(id)
}

/// Record a hand-entered income or expense. Returns the new record id.
///
/// An empty note becomes `Manual income` or `Manual expense`.
///
/// # Errors
///
/// Returns `BillingError::InvalidInput` unless `amount` is finite and
/// greater than zero.
pub fn add_manual_entry<S: KeyValueStore + ?Sized>(
    store: &S,
    kind: EntryKind,
    amount: f64,
    note: Option<&str>,
) -> Result<String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BillingError::InvalidInput(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    let note = match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => note.to_string(),
        None => match kind {
            EntryKind::Income => "Manual income".to_string(),
            EntryKind::Expense => "Manual expense".to_string(),
        },
    };
    let id = Uuid::new_v4().to_string();
    let record = json!({
        "id": id,
        "date": now_iso(),
        "amount": amount,
        "source": "manual",
        "note": note,
    });
    append(store, kind, record);
    tracing::debug!(id = %id, kind = %kind, amount, "recorded manual entry");
    Ok(id)
}

/// Append `record` in whichever shape the ledger is stored.
///
/// A legacy array stays an array: the record gets its `type`, `source` and
/// `note` and is pushed to the end, and existing records are not touched.
fn append<S: KeyValueStore + ?Sized>(store: &S, kind: EntryKind, mut record: Value) {
    match store.load(ACCOUNTS_KEY, Value::Null) {
        Value::Array(mut records) => {
            record["type"] = json!(kind.as_str());
            if record.get("source").is_none() {
                record["source"] = json!("manual");
            }
            if record.get("note").is_none() {
                record["note"] = json!(default_note(kind, &record));
            }
            records.push(record);
            store.save(ACCOUNTS_KEY, &records);
        }
        raw => {
            let mut data = Accounts::from_raw(raw);
            match kind {
                EntryKind::Income => data.income.push(record),
                EntryKind::Expense => data.expense.push(record),
            }
            store.save(ACCOUNTS_KEY, &data);
        }
    }
}

/// Note the grouped shape would show for a record without one.
fn default_note(kind: EntryKind, record: &Value) -> String {
    let text = |field: &str| {
        record
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    match kind {
        EntryKind::Income => format!("Bill {}", text("ref").unwrap_or(""))
            .trim_end()
            .to_string(),
        EntryKind::Expense => text("category").unwrap_or("Expense").to_string(),
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BillingError::InvalidInput(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntrySource;
    use crate::store::MemoryStore;

    #[test]
    fn test_accounts_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(accounts(&store), Accounts::default());
    }

    #[test]
    fn test_accounts_repairs_bad_groups() {
        let store = MemoryStore::with_entries([(ACCOUNTS_KEY, r#"{"income":5}"#)]);
        let data = accounts(&store);
        assert!(data.income.is_empty());
        assert!(data.expense.is_empty());
    }

    #[test]
    fn test_add_income_and_expense_round_trip() {
        let store = MemoryStore::new();
        add_income_from_bill(&store, "B-7", 250.0, None).unwrap();
        add_expense(&store, 40.0, Some("fuel"), None).unwrap();

        let entries = load_entries(&store);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EntryKind::Income);
        assert_eq!(entries[0].source, EntrySource::Bill);
        assert_eq!(entries[0].note, "Bill B-7");
        assert_eq!(entries[0].amount, 250.0);
        assert_eq!(entries[1].kind, EntryKind::Expense);
        assert_eq!(entries[1].note, "fuel");
    }

    #[test]
    fn test_append_keeps_legacy_shape() {
        let store = MemoryStore::with_entries([(
            ACCOUNTS_KEY,
            r#"[{"id":"old-in","amount":5},{"id":"old-out","type":"expense","amount":2}]"#,
        )]);

        add_expense(&store, 1.0, None, Some("tape")).unwrap();

        let raw: Value = store.load(ACCOUNTS_KEY, Value::Null);
        let records = raw.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], json!({"id": "old-in", "amount": 5}));
        assert_eq!(records[2]["type"], "expense");
        assert_eq!(records[2]["source"], "manual");
        assert_eq!(records[2]["note"], "tape");

        add_income_from_bill(&store, "B-3", 10.0, None).unwrap();
        let entries = load_entries(&store);
        assert_eq!(entries[3].source, EntrySource::Bill);
        assert_eq!(entries[3].bill_ref.as_deref(), Some("B-3"));
        assert_eq!(entries[3].note, "Bill B-3");
    }

    #[test]
    fn test_legacy_entries_read_the_same_after_append() {
        let store = MemoryStore::with_entries([(
            ACCOUNTS_KEY,
            r#"[{"id":"old-in","amount":5,"note":"tip","date":"2024-01-02T00:00:00.000Z"}]"#,
        )]);
        let before = load_entries(&store);

        add_expense(&store, 3.0, Some("fuel"), None).unwrap();
        let after = load_entries(&store);

        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[0].source, EntrySource::Manual);
        assert_eq!(after[0].note, "tip");
        assert_eq!(after[1].kind, EntryKind::Expense);
        assert_eq!(after[1].note, "fuel");
    }

    #[test]
    fn test_accounts_view_fills_legacy_defaults() {
        let store = MemoryStore::with_entries([(
            ACCOUNTS_KEY,
            r#"[{"id":"old-in","amount":5,"date":"2024-01-02T00:00:00.000Z"},{"id":"old-out","type":"expense","amount":2,"note":"tape","date":"2024-01-03T00:00:00.000Z"}]"#,
        )]);
        let legacy = load_entries(&store);

        let data = accounts(&store);
        assert_eq!(data.income[0]["source"], "manual");
        assert_eq!(data.income[0]["note"], "");
        assert_eq!(data.expense[0]["source"], "manual");

        let split = normalize(&serde_json::to_value(&data).unwrap());
        assert_eq!(split[0].source, legacy[0].source);
        assert_eq!(split[0].bill_ref, legacy[0].bill_ref);
        assert_eq!(split[1], legacy[1]);
    }

    #[test]
    fn test_manual_entries_default_notes() {
        let store = MemoryStore::new();
        add_manual_entry(&store, EntryKind::Income, 80.0, None).unwrap();
        add_manual_entry(&store, EntryKind::Expense, 20.0, Some("  ")).unwrap();
        add_manual_entry(&store, EntryKind::Income, 5.0, Some("tip")).unwrap();

        let entries = load_entries(&store);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].source, EntrySource::Manual);
        assert_eq!(entries[0].note, "Manual income");
        assert!(entries[0].bill_ref.is_none());
        assert_eq!(entries[1].note, "tip");
        assert_eq!(entries[2].kind, EntryKind::Expense);
        assert_eq!(entries[2].note, "Manual expense");
    }

    #[test]
    fn test_manual_entry_on_legacy_ledger() {
        let store = MemoryStore::with_entries([(ACCOUNTS_KEY, r#"[{"id":"a","amount":1}]"#)]);
        add_manual_entry(&store, EntryKind::Expense, 4.0, None).unwrap();

        let entries = load_entries(&store);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].kind, EntryKind::Expense);
        assert_eq!(entries[1].source, EntrySource::Manual);
        assert_eq!(entries[1].note, "Manual expense");
    }

    #[test]
    fn test_manual_entry_rejects_zero() {
        let store = MemoryStore::new();
        let err = add_manual_entry(&store, EntryKind::Income, 0.0, None).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput(_)));
        assert!(store.get_raw(ACCOUNTS_KEY).is_none());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let store = MemoryStore::new();
        let err = add_expense(&store, -1.0, None, None).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput(_)));
        assert!(store.get_raw(ACCOUNTS_KEY).is_none());
    }
}
