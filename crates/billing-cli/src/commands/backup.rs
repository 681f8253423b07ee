use std::path::Path;

use billing_core::backup::{BackupManager, ImportOptions};

use crate::app::{missing_document_error, AppContext};
use crate::cli::{ExportArgs, ImportArgs};
use crate::errors::CliError;
use crate::output::{import_items, import_report_json};
use crate::ui::{badge, print, receipt, Badge};

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let dir = ctx.export_dir(args.dir.as_deref())?;
    let manager = BackupManager::new(ctx.open_store()?, None);
    let path = manager.export_to_dir(&dir).map_err(CliError::from)?;
    tracing::info!(path = %path.display(), "exported backup document");

    if ctx.quiet() {
        println!("{}", path.display());
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    print(
        &ui_ctx,
        &receipt(&ui_ctx, "Backup exported", &[("Path", path.display().to_string())]),
    );
    Ok(())
}

pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let path = Path::new(&args.file);
    if !path.exists() {
        return Err(missing_document_error(path).into());
    }

    let manager = BackupManager::new(ctx.open_store()?, None);
    let report = manager
        .import_file(path, ImportOptions::overwrite(args.overwrite))
        .map_err(CliError::from)?;
    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "imported backup document"
    );

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&import_report_json(&report))?);
        return Ok(());
    }
    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Backup imported", &import_items(&report)));
        if !report.skipped.is_empty() && ui_ctx.mode.is_pretty() {
            print(
                &ui_ctx,
                &badge(
                    &ui_ctx,
                    Badge::Warn,
                    "Existing values were kept; pass --overwrite to replace them.",
                ),
            );
        }
    }
    Ok(())
}
