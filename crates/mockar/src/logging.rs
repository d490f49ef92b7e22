//! Tracing setup for test runs.
//!
//! Mockar emits `tracing` events for every intercepted call (targets
//! `mockar::handler`, `mockar::recording`, `mockar::proxy`). Nothing is
//! printed unless a subscriber is installed; [`init_tracing`] installs a
//! `tracing-subscriber` fmt subscriber filtered by `MOCKAR_LOG`, falling
//! back to `RUST_LOG`.
//!
//! ```rust,ignore
//! // MOCKAR_LOG=mockar=debug cargo test
//! mockar::logging::init_tracing(&LogConfig::from_env());
//! ```

use std::env;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, TestWriter};
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `mockar=debug`
pub const LOG_ENV: &str = "MOCKAR_LOG";
/// Output format, `pretty` or `json`
pub const LOG_FORMAT_ENV: &str = "MOCKAR_LOG_FORMAT";

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names yield `None`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Output format
    pub format: LogFormat,
    /// Directive used when neither `MOCKAR_LOG` nor `RUST_LOG` is set
    pub default_directive: String,
    /// Write through libtest's captured output instead of stderr
    pub test_writer: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_directive: "warn".to_string(),
            test_writer: true,
        }
    }
}

impl LogConfig {
    /// Create a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with the format taken from `MOCKAR_LOG_FORMAT`
    #[must_use]
    pub fn from_env() -> Self {
        let format = env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|name| LogFormat::parse(&name))
            .unwrap_or_default();
        Self::default().with_format(format)
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the fallback directive
    #[must_use]
    pub fn with_default_directive(mut self, directive: &str) -> Self {
        self.default_directive = directive.to_string();
        self
    }

    /// Write to stderr instead of libtest's captured output
    #[must_use]
    pub fn with_stderr(mut self) -> Self {
        self.test_writer = false;
        self
    }

    /// Filter from `MOCKAR_LOG`, then `RUST_LOG`, then the fallback directive
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Install a global subscriber.
///
/// Returns `false` if one was already installed, which is the normal case
/// for every test after the first in a binary.
pub fn init_tracing(config: &LogConfig) -> bool {
    let writer = if config.test_writer {
        BoxMakeWriter::new(TestWriter::new())
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(writer);
    let installed = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" pretty "), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .with_format(LogFormat::Json)
            .with_default_directive("mockar=trace")
            .with_stderr();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_directive, "mockar=trace");
        assert!(!config.test_writer);
    }

    #[test]
    fn test_filter_precedence() {
        let saved = [LOG_ENV, "RUST_LOG"].map(|key| (key, env::var_os(key)));
        let config = LogConfig::new().with_default_directive("mockar=trace");

        env::remove_var(LOG_ENV);
        env::remove_var("RUST_LOG");
        assert_eq!(config.env_filter().to_string(), "mockar=trace");

        env::set_var("RUST_LOG", "mockar=info");
        assert_eq!(config.env_filter().to_string(), "mockar=info");

        env::set_var(LOG_ENV, "mockar=debug");
        assert_eq!(config.env_filter().to_string(), "mockar=debug");

        for (key, value) in saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    fn test_second_init_is_noop() {
        let config = LogConfig::new();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
