use chrono::Utc;
use serde_json::Value;

use billing_core::ledger::{
    add_expense, add_income_from_bill, add_manual_entry, filter_entries, load_entries, summarize,
    EntryKind, LedgerFilter, Period, BILLS_KEY,
};
use billing_core::store::FileStore;
use billing_core::KeyValueStoreExt;

use crate::app::AppContext;
use crate::cli::LedgerFilterArgs;
use crate::errors::CliError;
use crate::output::{entries_json, entry_list, summary, summary_json};
use crate::ui::{money, print, receipt};

fn build_filter(args: &LedgerFilterArgs) -> Result<LedgerFilter, CliError> {
    let period: Period = args.period.parse()?;
    let mut filter = LedgerFilter::new().period(period);
    if let Some(vehicle) = args.vehicle.as_deref() {
        filter = filter.vehicle(vehicle);
    }
    Ok(filter)
}

fn bills(store: &FileStore, filter: &LedgerFilter) -> Value {
    if filter.vehicle.is_some() {
        store.load(BILLS_KEY, Value::Null)
    } else {
        Value::Null
    }
}

pub fn handle_list(ctx: &AppContext, args: &LedgerFilterArgs, json: bool) -> anyhow::Result<()> {
    let filter = build_filter(args)?;
    let store = ctx.open_store()?;
    let entries = load_entries(&store);
    let selected = filter_entries(&entries, &filter, &bills(&store, &filter), Utc::now());

    let ui_ctx = ctx.ui_context(json);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&entries_json(&selected))?);
        return Ok(());
    }

    let rendered = entry_list(&ui_ctx, &selected);
    if !rendered.is_empty() {
        print(&ui_ctx, &rendered);
    }
    Ok(())
}

pub fn handle_summary(
    ctx: &AppContext,
    args: &LedgerFilterArgs,
    json: bool,
) -> anyhow::Result<()> {
    let filter = build_filter(args)?;
    let store = ctx.open_store()?;
    let entries = load_entries(&store);
    let selected = filter_entries(&entries, &filter, &bills(&store, &filter), Utc::now());
    let totals = summarize(selected.iter().copied());

    let ui_ctx = ctx.ui_context(json);
    if ui_ctx.mode.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary_json(&totals, selected.len()))?
        );
        return Ok(());
    }

    print(&ui_ctx, &summary(&ui_ctx, &totals, selected.len()));
    Ok(())
}

pub fn handle_add_income(
    ctx: &AppContext,
    bill: &str,
    amount: f64,
    note: Option<&str>,
) -> anyhow::Result<()> {
    if bill.trim().is_empty() {
        return Err(CliError::invalid_input("Bill number must not be empty").into());
    }
    let store = ctx.open_store()?;
    let id = add_income_from_bill(&store, bill.trim(), amount, note).map_err(CliError::from)?;
    print_recorded(ctx, "Income recorded", &id, amount);
    Ok(())
}

pub fn handle_add_expense(
    ctx: &AppContext,
    amount: f64,
    category: Option<&str>,
    note: Option<&str>,
) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let id = add_expense(&store, amount, category, note).map_err(CliError::from)?;
    print_recorded(ctx, "Expense recorded", &id, amount);
    Ok(())
}

pub fn handle_add_manual(
    ctx: &AppContext,
    kind: &str,
    amount: f64,
    note: Option<&str>,
) -> anyhow::Result<()> {
    let kind: EntryKind = kind.parse().map_err(CliError::from)?;
    let store = ctx.open_store()?;
    let id = add_manual_entry(&store, kind, amount, note).map_err(CliError::from)?;
    let title = match kind {
        EntryKind::Income => "Income recorded",
        EntryKind::Expense => "Expense recorded",
    };
    print_recorded(ctx, title, &id, amount);
    Ok(())
}

fn print_recorded(ctx: &AppContext, title: &str, id: &str, amount: f64) {
    if ctx.quiet() {
        println!("{}", id);
        return;
    }
    let ui_ctx = ctx.ui_context(false);
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            title,
            &[("ID", id.to_string()), ("Amount", money(amount))],
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(period: &str, vehicle: Option<&str>) -> LedgerFilterArgs {
        LedgerFilterArgs {
            period: period.to_string(),
            vehicle: vehicle.map(String::from),
        }
    }

    #[test]
    fn test_build_filter_parses_period_and_vehicle() {
        let filter = build_filter(&args("Month", Some("KA01"))).unwrap();
        assert_eq!(filter.period, Period::Month);
        assert_eq!(filter.vehicle.as_deref(), Some("KA01"));
    }

    #[test]
    fn test_build_filter_rejects_unknown_period() {
        let err = build_filter(&args("week", None)).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
