//! Command handlers, one module per command group.

pub mod backup;
pub mod init;
pub mod ledger;
pub mod misc;
pub mod snapshot;

use std::io::IsTerminal;

use crate::app::AppContext;

/// Ask for confirmation on an interactive terminal.
///
/// Without a TTY, or in quiet mode, the action proceeds unprompted.
pub(crate) fn confirm(ctx: &AppContext, prompt: &str, default: bool) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() || ctx.quiet() {
        return Ok(true);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
