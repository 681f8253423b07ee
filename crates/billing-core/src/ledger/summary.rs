//! Period and vehicle filtering plus income/expense totals.

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

use super::types::{EntryKind, EntrySource, LedgerEntry, LedgerFilter, Period, Summary};

/// Store key holding issued bills.
pub const BILLS_KEY: &str = "bills";

/// Entries retained by `filter`, in their original order.
///
/// `bills` is the raw value of the `bills` key; it is only consulted when
/// the filter names a vehicle.
pub fn filter_entries<'a>(
    entries: &'a [LedgerEntry],
    filter: &LedgerFilter,
    bills: &Value,
    now: DateTime<Utc>,
) -> Vec<&'a LedgerEntry> {
    let vehicle = filter.vehicle.as_deref().map(str::to_uppercase);
    entries
        .iter()
        .filter(|entry| match vehicle.as_deref() {
            Some(query) => matches_vehicle(entry, query, bills),
            None => true,
        })
        .filter(|entry| in_period(entry, filter.period, now))
        .collect()
}

/// Sum income and expense; balance is their difference.
pub fn summarize<'a, I>(entries: I) -> Summary
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut summary = Summary::default();
    for entry in entries {
        match entry.kind {
            EntryKind::Income => summary.income += entry.amount,
            EntryKind::Expense => summary.expense += entry.amount,
        }
    }
    summary.balance = summary.income - summary.expense;
    summary
}

fn in_period(entry: &LedgerEntry, period: Period, now: DateTime<Utc>) -> bool {
    if period == Period::All {
        return true;
    }
    let Some(at) = entry.occurred_at_utc() else {
        return false;
    };
    match period {
        Period::All => true,
        Period::Day => at.date_naive() == now.date_naive(),
        Period::Month => at.year() == now.year() && at.month() == now.month(),
        Period::Year => at.year() == now.year(),
    }
}

fn matches_vehicle(entry: &LedgerEntry, query: &str, bills: &Value) -> bool {
    if entry.source != EntrySource::Bill {
        return false;
    }
    let Some(reference) = entry.bill_ref.as_deref() else {
        return false;
    };
    let Some(bill) = bills
        .as_array()
        .and_then(|bills| bills.iter().find(|bill| bill_number(bill).as_deref() == Some(reference)))
    else {
        return false;
    };
    bill.pointer("/customerInfo/vehicleNo")
        .and_then(Value::as_str)
        .map(|vno| vno.to_uppercase().contains(query))
        .unwrap_or(false)
}

fn bill_number(bill: &Value) -> Option<String> {
    match bill.get("number")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::normalize::normalize;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixture() -> Vec<LedgerEntry> {
        normalize(&json!({
            "income": [
                { "id": "i1", "amount": 100, "ref": "B-1", "date": "2024-05-10T09:00:00.000Z" },
                { "id": "i2", "amount": 60, "ref": "B-2", "date": "2024-04-02T09:00:00.000Z" }
            ],
            "expense": [
                { "id": "e1", "amount": 30, "category": "fuel", "date": "2024-05-10T12:00:00.000Z" },
                { "id": "e2", "amount": 5, "date": "not a date" }
            ]
        }))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_summarize_all() {
        let entries = fixture();
        let kept = filter_entries(&entries, &LedgerFilter::new(), &Value::Null, now());
        let summary = summarize(kept);
        assert_eq!(summary.income, 160.0);
        assert_eq!(summary.expense, 35.0);
        assert_eq!(summary.balance, 125.0);
    }

    #[test]
    fn test_period_filters_and_skips_unparseable_dates() {
        let entries = fixture();

        let day = filter_entries(&entries, &LedgerFilter::new().period(Period::Day), &Value::Null, now());
        let ids: Vec<_> = day.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "e1"]);

        let year = filter_entries(&entries, &LedgerFilter::new().period(Period::Year), &Value::Null, now());
        assert_eq!(year.len(), 3);
    }

    #[test]
    fn test_vehicle_filter_uses_bills() {
        let entries = fixture();
        let bills = json!([
            { "number": "B-1", "customerInfo": { "vehicleNo": "KA01AB1234" } },
            { "number": "B-2", "customerInfo": { "vehicleNo": "MH12XY0001" } }
        ]);

        let kept = filter_entries(&entries, &LedgerFilter::new().vehicle("ka01"), &bills, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "i1");

        let none = filter_entries(&entries, &LedgerFilter::new().vehicle("ka01"), &Value::Null, now());
        assert!(none.is_empty());
    }
}
