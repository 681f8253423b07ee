//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with command output. The filter is
//! read from `BILLING_LOG` (e.g. `billing_core=debug`) and defaults to
//! warnings only.

use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::LOG_ENV;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let _ = fmt()
        .with_env_filter(filter_from(std::env::var(LOG_ENV).ok()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn filter_from(value: Option<String>) -> EnvFilter {
    value
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_warn() {
        assert_eq!(filter_from(None).to_string(), "warn");
        assert_eq!(filter_from(Some("  ".to_string())).to_string(), "warn");
    }

    #[test]
    fn test_filter_uses_env_value() {
        assert_eq!(
            filter_from(Some("billing_core=debug".to_string())).to_string(),
            "billing_core=debug"
        );
    }
}
