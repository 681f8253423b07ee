//! UI context for environment detection.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols and table borders are enabled
    pub unicode: bool,
    /// Resolved output mode
    pub mode: OutputMode,
}

impl UiContext {
    /// Create context from the environment and the `--json` flag.
    ///
    /// Color is disabled by `NO_COLOR`, `TERM=dumb` or a non-TTY stdout.
    pub fn from_env(json_flag: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term = std::env::var("TERM").unwrap_or_default();
        let term_is_dumb = term == "dumb";
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        Self {
            color: is_tty && !no_color_env && !term_is_dumb,
            unicode: !term_is_dumb,
            mode: OutputMode::resolve(json_flag, is_tty, term_is_dumb),
        }
    }

    /// Context for writing to stderr, where JSON is never used.
    pub fn for_errors() -> Self {
        let is_tty = std::io::stderr().is_terminal();
        let no_color_env = std::env::var_os("NO_COLOR").is_some();
        Self {
            color: is_tty && !no_color_env,
            unicode: true,
            mode: if is_tty {
                OutputMode::Pretty
            } else {
                OutputMode::Plain
            },
        }
    }
}
