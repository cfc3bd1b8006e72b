//! Logging setup
//!
//! Logs go to stderr so stdout only carries report lines. The filter comes
//! from `IMAGE_PEEK_LOG` when set (any `EnvFilter` directive), otherwise from
//! the configured level.

use clap::ValueEnum;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter
pub const LOG_ENV: &str = "IMAGE_PEEK_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn build_filter(env_directive: Option<String>, level: LogLevel) -> EnvFilter {
    env_directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber.
///
/// Fails if a subscriber was already installed.
pub fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let filter = build_filter(std::env::var(LOG_ENV).ok(), level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tracing_subscriber::filter::LevelFilter;

    #[rstest]
    #[case(None, LogLevel::Error, LevelFilter::ERROR)]
    #[case(None, LogLevel::Debug, LevelFilter::DEBUG)]
    #[case(Some("trace"), LogLevel::Error, LevelFilter::TRACE)]
    #[case(Some("image_peek=info"), LogLevel::Error, LevelFilter::INFO)]
    #[case(Some("image_peek=loud"), LogLevel::Warn, LevelFilter::WARN)] // invalid directive falls back
    fn build_filter_prefers_env_directive(
        #[case] env_directive: Option<&str>,
        #[case] level: LogLevel,
        #[case] expected: LevelFilter,
    ) {
        let filter = build_filter(env_directive.map(str::to_string), level);
        assert_eq!(filter.max_level_hint(), Some(expected));
    }

    #[test]
    fn log_level_parses_from_cli_value() {
        assert_eq!(LogLevel::from_str("debug", true), Ok(LogLevel::Debug));
        assert!(LogLevel::from_str("loud", true).is_err());
    }
}
