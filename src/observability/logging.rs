//! Structured logging.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Environment variable holding a log filter directive.
pub const ENV_LOG: &str = "LINKSHELF_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Event filter.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
    /// Log file, stderr when `None`.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds the logging configuration from settings and the environment.
    ///
    /// The filter comes from `LINKSHELF_LOG`, then `RUST_LOG`, then the
    /// configured level, then `debug` with `verbose` or `info` without.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let directive = resolve_directive(
            |key| std::env::var(key).ok(),
            settings.and_then(|s| s.level.as_deref()),
            verbose,
        );
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

        Self {
            filter,
            format: settings
                .and_then(|s| s.format.as_deref())
                .map(LogFormat::parse)
                .unwrap_or_default(),
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}

fn resolve_directive<F>(lookup: F, configured: Option<&str>, verbose: bool) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    set(ENV_LOG)
        .or_else(|| set("RUST_LOG"))
        .or_else(|| configured.map(ToString::to_string))
        .unwrap_or_else(|| if verbose { "debug" } else { "info" }.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("fancy"), LogFormat::Pretty);
    }

    #[test]
    fn test_resolve_directive_precedence() {
        let none = |_: &str| None;
        assert_eq!(resolve_directive(none, None, false), "info");
        assert_eq!(resolve_directive(none, None, true), "debug");
        assert_eq!(resolve_directive(none, Some("warn"), true), "warn");

        let rust_log = |key: &str| (key == "RUST_LOG").then(|| "error".to_string());
        assert_eq!(resolve_directive(rust_log, Some("warn"), false), "error");

        let both = |key: &str| match key {
            ENV_LOG => Some("linkshelf=trace".to_string()),
            _ => Some("error".to_string()),
        };
        assert_eq!(resolve_directive(both, None, false), "linkshelf=trace");
    }

    #[test]
    fn test_empty_linkshelf_log_falls_back_to_rust_log() {
        let blank = |key: &str| match key {
            ENV_LOG => Some("  ".to_string()),
            _ => Some("error".to_string()),
        };
        assert_eq!(resolve_directive(blank, Some("warn"), false), "error");

        let both_blank = |_: &str| Some(String::new());
        assert_eq!(resolve_directive(both_blank, Some("warn"), false), "warn");
    }

    #[test]
    fn test_from_settings_keeps_format_and_file() {
        let settings = LoggingSettings {
            level: Some("debug".to_string()),
            format: Some("json".to_string()),
            file: Some(PathBuf::from("/tmp/linkshelf.log")),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/linkshelf.log")));
    }
}
