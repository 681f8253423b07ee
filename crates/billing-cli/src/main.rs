//! Billing CLI - local store, ledger and backups for a small shop
//!
//! This is the command-line interface for Billing. It drives the core
//! library: ledger entries and totals, backup documents, and local
//! snapshots.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod logging;
mod output;
mod ui;

use clap::Parser;

use billing_core::BillingError;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, LedgerCommands, SnapshotCommands};
use crate::commands::{backup, init, ledger, misc, snapshot};
use crate::errors::CliError;
use crate::ui::{print_error, UiContext};

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(err) = run(&ctx, &cli).await {
        let ui_ctx = UiContext::for_errors();
        let code = exit_code(&err);
        print_error(&ui_ctx, &error_text(&err));
        std::process::exit(code);
    }
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => init::handle_init(ctx, args)?,
        Commands::Export(args) => backup::handle_export(ctx, args)?,
        Commands::Import(args) => backup::handle_import(ctx, args)?,
        Commands::Snapshot(command) => match command {
            SnapshotCommands::Save => snapshot::handle_save(ctx).await?,
            SnapshotCommands::List { json } => snapshot::handle_list(ctx, *json).await?,
            SnapshotCommands::Delete { id, yes } => {
                snapshot::handle_delete(ctx, id, *yes).await?
            }
            SnapshotCommands::Restore {
                id,
                overwrite,
                yes,
                json,
            } => snapshot::handle_restore(ctx, id, *overwrite, *yes, *json).await?,
        },
        Commands::Ledger(command) => match command {
            LedgerCommands::List { filter, json } => ledger::handle_list(ctx, filter, *json)?,
            LedgerCommands::Summary { filter, json } => {
                ledger::handle_summary(ctx, filter, *json)?
            }
            LedgerCommands::Add { kind, amount, note } => {
                ledger::handle_add_manual(ctx, kind, *amount, note.as_deref())?
            }
            LedgerCommands::AddIncome { bill, amount, note } => {
                ledger::handle_add_income(ctx, bill, *amount, note.as_deref())?
            }
            LedgerCommands::AddExpense {
                amount,
                category,
                note,
            } => ledger::handle_add_expense(ctx, *amount, category.as_deref(), note.as_deref())?,
        },
        Commands::Completions { shell } => misc::handle_completions(*shell)?,
    }
    Ok(())
}

/// Exit code for a failed command; typed errors get their own codes.
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(core_err) = err.downcast_ref::<BillingError>() {
        return CliError::from(core_err.clone()).exit_code();
    }
    1
}

fn error_text(err: &anyhow::Error) -> String {
    if let Some(core_err) = err.downcast_ref::<BillingError>() {
        return CliError::from(core_err.clone()).to_string();
    }
    format!("{:#}", err)
}
