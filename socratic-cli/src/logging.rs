//! Opt-in `tracing` output for the engine.
//!
//! Nothing is installed unless `SOCRATIC_LOG` is set. Its value is an
//! `EnvFilter` expression; `1`, `on` and `true` select the default filter,
//! `0`, `off` and `false` keep logging disabled.

use std::sync::Once;

/// Environment variable that enables logging.
pub const LOG_ENV: &str = "SOCRATIC_LOG";

const DEFAULT_FILTER: &str = "socratic_vm=debug,socratic_cli=debug";

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber if `SOCRATIC_LOG` asks for one.
///
/// Safe to call more than once.
pub fn maybe_init_tracing() {
    let raw = match std::env::var(LOG_ENV) {
        Ok(value) => value,
        Err(_) => return,
    };

    if !toggle_enabled(&raw) {
        return;
    }

    TRACING_INIT.call_once(|| {
        use tracing_subscriber::fmt;
        use tracing_subscriber::EnvFilter;

        let builder = fmt().with_writer(std::io::stderr).with_target(true);

        let builder = match filter_expr_from(&raw).and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn toggle_enabled(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "off" | "false"
    )
}

/// The filter expression in `raw`, or `None` for a plain on-switch.
fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "1" | "on" | "true" => None,
        _ => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles() {
        assert!(toggle_enabled("1"));
        assert!(toggle_enabled("socratic_vm=trace"));
        assert!(toggle_enabled(""));
        assert!(!toggle_enabled("0"));
        assert!(!toggle_enabled(" OFF "));
        assert!(!toggle_enabled("false"));
    }

    #[test]
    fn filter_expressions() {
        assert_eq!(filter_expr_from("1"), None);
        assert_eq!(filter_expr_from("On"), None);
        assert_eq!(filter_expr_from("  "), None);
        assert_eq!(
            filter_expr_from(" socratic_vm=trace "),
            Some("socratic_vm=trace".to_string())
        );
    }
}
