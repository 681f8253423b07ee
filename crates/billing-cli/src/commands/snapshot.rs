use billing_core::backup::ImportOptions;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::output::{import_items, import_report_json, snapshot_list, snapshots_json};
use crate::ui::{badge, print, receipt, Badge};

use super::confirm;

pub async fn handle_save(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let manager = ctx.backups().await?;
    let snapshot = manager.save_snapshot().await.map_err(CliError::from)?;
    tracing::info!(id = %snapshot.id, "saved snapshot");

    if ctx.quiet() {
        println!("{}", snapshot.id);
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    let captured = snapshot.data.values().filter(|v| !v.is_null()).count();
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Snapshot saved",
            &[
                ("ID", snapshot.id.clone()),
                ("Keys", captured.to_string()),
            ],
        ),
    );
    Ok(())
}

pub async fn handle_list(ctx: &AppContext<'_>, json: bool) -> anyhow::Result<()> {
    let manager = ctx.backups().await?;
    let snapshots = manager.list_snapshots().await;

    let ui_ctx = ctx.ui_context(json);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&snapshots_json(&snapshots))?);
        return Ok(());
    }

    if !manager.snapshots_available() && ui_ctx.mode.is_pretty() {
        print(
            &ui_ctx,
            &badge(&ui_ctx, Badge::Warn, "Local snapshots are unavailable."),
        );
    }
    let rendered = snapshot_list(&ui_ctx, &snapshots);
    if !rendered.is_empty() {
        print(&ui_ctx, &rendered);
    }
    Ok(())
}

pub async fn handle_delete(ctx: &AppContext<'_>, id: &str, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(ctx, &format!("Delete snapshot {}?", id), false)? {
        return Err(anyhow::anyhow!("Delete cancelled"));
    }

    let manager = ctx.backups().await?;
    manager.delete_snapshot(id).await.map_err(CliError::from)?;
    tracing::info!(id, "deleted snapshot");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Snapshot deleted", &[("ID", id.to_string())]),
        );
    }
    Ok(())
}

pub async fn handle_restore(
    ctx: &AppContext<'_>,
    id: &str,
    overwrite: bool,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let prompt = if overwrite {
        format!("Restore snapshot {} and replace existing values?", id)
    } else {
        format!("Restore snapshot {}?", id)
    };
    if !yes && !confirm(ctx, &prompt, true)? {
        return Err(anyhow::anyhow!("Restore cancelled"));
    }

    let manager = ctx.backups().await?;
    let report = manager
        .restore_snapshot(id, ImportOptions::overwrite(overwrite))
        .await
        .map_err(CliError::from)?;
    tracing::info!(
        id,
        written = report.written.len(),
        skipped = report.skipped.len(),
        "restored snapshot"
    );

    let ui_ctx = ctx.ui_context(json);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&import_report_json(&report))?);
        return Ok(());
    }
    if !ctx.quiet() {
        let mut items = vec![("ID", id.to_string())];
        items.extend(import_items(&report));
        print(&ui_ctx, &receipt(&ui_ctx, "Snapshot restored", &items));
    }
    Ok(())
}
