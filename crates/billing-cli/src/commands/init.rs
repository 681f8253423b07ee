use std::path::PathBuf;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_snapshots_path, default_store_path, write_config, BillingConfig};
use crate::errors::CliError;
use crate::ui::{hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nPass --force to replace it.",
            config_path.display()
        ))
        .into());
    }

    let store_path = match ctx.cli_store_path() {
        Some(path) => path,
        None => default_store_path()?,
    };
    let snapshots_path = match args.snapshots_path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => default_snapshots_path()?,
    };
    let export_dir = args.export_dir.as_deref().map(PathBuf::from);

    if let Some(parent) = store_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create data directory {}: {}", parent.display(), e)
        })?;
    }

    let config = BillingConfig::new(store_path, snapshots_path, export_dir);
    write_config(&config_path, &config)?;
    tracing::info!(path = %config_path.display(), "wrote config");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Billing initialized",
                &[
                    ("Config", config_path.display().to_string()),
                    ("Store", config.store.path.clone()),
                    ("Snapshots", config.snapshots.path.clone()),
                ],
            ),
        );
        if ui_ctx.mode.is_pretty() {
            print(&ui_ctx, &hint(&ui_ctx, "billing ledger summary"));
        }
    }
    Ok(())
}
