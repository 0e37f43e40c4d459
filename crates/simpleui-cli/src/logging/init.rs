use std::sync::Once;

use env_logger::{Builder, WriteStyle};

/// Level used when neither flags, `RUST_LOG` nor the config file name one.
pub const DEFAULT_LEVEL: &str = "info";

/// Filter string for a run, in `env_logger` syntax.
///
/// `--verbose` wins, then `RUST_LOG`, then `[log] level` from
/// `simpleui.toml`, then [`DEFAULT_LEVEL`].
pub fn resolve_filter(verbose: bool, rust_log: Option<String>, configured: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .filter(|f| !f.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

static INIT: Once = Once::new();

/// Installs the global logger on first call; later calls are ignored.
/// Records go to stderr, without timestamps.
pub fn init_logging(verbose: bool, configured_level: Option<&str>) {
    let filter = resolve_filter(verbose, std::env::var("RUST_LOG").ok(), configured_level);
    INIT.call_once(|| {
        Builder::new()
            .parse_filters(&filter)
            .write_style(WriteStyle::Auto)
            .format_timestamp(None)
            .format_target(verbose)
            .init();
        log::debug!("logging initialized with filter {filter:?}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(resolve_filter(true, Some("warn".into()), Some("error")), "debug");
    }

    #[test]
    fn rust_log_beats_config() {
        let filter = resolve_filter(false, Some("simpleui_codegen=trace".into()), Some("warn"));
        assert_eq!(filter, "simpleui_codegen=trace");
    }

    #[test]
    fn config_level_then_default() {
        assert_eq!(resolve_filter(false, None, Some("warn")), "warn");
        assert_eq!(resolve_filter(false, Some("  ".into()), None), DEFAULT_LEVEL);
    }
}
