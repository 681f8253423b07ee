//! Badges and color helpers.

use owo_colors::OwoColorize;

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
}

impl Badge {
    /// Badge text, e.g. `[OK]` or `[✓]`.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",
            (Self::Ok, false) => "[OK]",
            (Self::Warn, true) => "[!]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, true) => "[\u{2717}]",
            (Self::Err, false) => "[ERR]",
        }
    }

    /// Badge text colored for its kind when `color` is set.
    pub fn paint(&self, unicode: bool, color: bool) -> String {
        let text = self.display(unicode);
        if !color {
            return text.to_string();
        }
        match self {
            Self::Ok => text.green().bold().to_string(),
            Self::Warn => text.yellow().bold().to_string(),
            Self::Err => text.red().bold().to_string(),
        }
    }
}

/// Dim `text` when `color` is set.
pub fn dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Green for a non-negative amount, red for a negative one.
pub fn signed(text: &str, negative: bool, color: bool) -> String {
    match (color, negative) {
        (false, _) => text.to_string(),
        (true, false) => text.green().to_string(),
        (true, true) => text.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_display() {
        assert_eq!(Badge::Ok.display(false), "[OK]");
        assert_eq!(Badge::Ok.display(true), "[\u{2713}]");
        assert_eq!(Badge::Err.display(false), "[ERR]");
    }

    #[test]
    fn test_no_color_leaves_text_alone() {
        assert_eq!(Badge::Warn.paint(false, false), "[WARN]");
        assert_eq!(dim("label", false), "label");
        assert_eq!(signed("-5.00", true, false), "-5.00");
    }

    #[test]
    fn test_color_adds_escapes() {
        assert!(Badge::Ok.paint(false, true).contains("\u{1b}["));
        assert!(signed("5.00", false, true).contains("5.00"));
    }
}
