//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::theme::{dim, Badge};

/// Column definition for table rendering.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    /// Right-align the cells (amounts)
    pub numeric: bool,
}

impl Column {
    pub const fn text(header: &'static str) -> Self {
        Self {
            header,
            numeric: false,
        }
    }

    pub const fn numeric(header: &'static str) -> Self {
        Self {
            header,
            numeric: true,
        }
    }
}

/// Render a table.
///
/// Pretty mode: bordered comfy-table with headers
/// Plain mode: tab-separated rows, no header
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns.iter().map(|c| Cell::new(c.header)));

    for row in rows {
        table.add_row(row.iter().zip(columns).map(|(value, column)| {
            let cell = Cell::new(value);
            if column.numeric {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            }
        }));
    }

    table.to_string()
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        format!("{} {}", dim(&format!("{}:", key), ctx.color), value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a badge followed by a message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    format!("{} {}", kind.paint(ctx.unicode, ctx.color), message)
}

/// Render the outcome of an action.
///
/// Pretty mode: badge plus indented key-value pairs
/// Plain mode: `status=ok` plus `key=value` lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, String)]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }
    lines.join("\n")
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        format!("{} {}", dim("Hint:", ctx.color), text)
    } else {
        format!("hint={}", text)
    }
}

/// Format an error message, splitting off a trailing hint line.
///
/// Pretty mode: "[ERR] message" with "Hint: ..." on the next line
/// Plain mode: "error=message" with "hint=..."
pub fn error_message(ctx: &UiContext, message: &str) -> String {
    let (message, error_hint) = match message.split_once('\n') {
        Some((head, tail)) => (head, Some(tail.trim())),
        None => (message, None),
    };

    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
    } else {
        lines.push(format!("error={}", message));
    }
    if let Some(h) = error_hint.filter(|h| !h.is_empty()) {
        lines.push(hint(ctx, h));
    }
    lines.join("\n")
}

/// Print a message to stdout unless JSON output was requested.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print an error message to stderr.
pub fn print_error(ctx: &UiContext, message: &str) {
    eprintln!("{}", error_message(ctx, message));
}

/// Two-decimal money formatting.
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;

    fn plain_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: false,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_kv_modes() {
        assert_eq!(kv(&plain_ctx(), "Snapshot ID", "snap-1"), "snapshot_id=snap-1");
        assert_eq!(kv(&pretty_ctx(), "Snapshot ID", "snap-1"), "Snapshot ID: snap-1");
    }

    #[test]
    fn test_receipt_plain() {
        let out = receipt(&plain_ctx(), "Saved", &[("ID", "snap-1".to_string())]);
        assert_eq!(out, "status=ok\nid=snap-1");
    }

    #[test]
    fn test_table_plain_has_no_header() {
        let columns = [Column::text("ID"), Column::numeric("Amount")];
        let rows = vec![vec!["a".to_string(), "1.00".to_string()]];
        assert_eq!(table(&plain_ctx(), &columns, &rows), "a\t1.00");
    }

    #[test]
    fn test_table_pretty_has_header_and_cells() {
        let columns = [Column::text("ID"), Column::numeric("Amount")];
        let rows = vec![vec!["snap-1".to_string(), "12.50".to_string()]];
        let out = table(&pretty_ctx(), &columns, &rows);
        assert!(out.contains("ID"));
        assert!(out.contains("Amount"));
        assert!(out.contains("snap-1"));
        assert!(out.contains("12.50"));
    }

    #[test]
    fn test_error_message_splits_hint() {
        let out = error_message(&plain_ctx(), "No snapshot snap-x\nRun `billing snapshot list`.");
        assert_eq!(out, "error=No snapshot snap-x\nhint=Run `billing snapshot list`.");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(12.5), "12.50");
        assert_eq!(money(-3.0), "-3.00");
    }
}
