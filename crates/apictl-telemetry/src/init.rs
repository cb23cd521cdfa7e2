//! Logging initialisation and configuration.
//!
//! # Design
//! - One entry point builds the subscriber (pretty or JSON) and writes to stderr
//!   so command output on stdout stays machine-readable.
//! - The subscriber is scoped to a guard instead of being installed globally.

use std::io;

use anyhow::{Result, anyhow};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor `--debug` is provided.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level or filter directive (e.g., `warn`, `apictl_client=debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::Pretty,
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable log lines.
    Pretty,
}

/// Keeps the subscriber installed; logging reverts to the previous default on drop.
#[must_use = "logging stops when the guard is dropped"]
pub struct LoggingGuard {
    _default: DefaultGuard,
}

/// Install the tracing subscriber as the default for the current thread.
///
/// `RUST_LOG` takes precedence over `config.level` when it is set and valid.
///
/// # Errors
///
/// Returns an error when neither `RUST_LOG` nor `config.level` is a valid
/// filter directive.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_env_filter(config.level)?;
    let default = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .set_default(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .set_default(),
    };
    Ok(LoggingGuard { _default: default })
}

fn build_env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(level).map_err(|err| anyhow!("invalid log level '{level}': {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_can_be_scoped_more_than_once() -> Result<()> {
        let config = LoggingConfig {
            level: "debug",
            format: LogFormat::Json,
        };
        let first = init_logging(&config)?;
        tracing::debug!("first subscriber");
        drop(first);

        let second = init_logging(&LoggingConfig::default())?;
        tracing::warn!("second subscriber");
        drop(second);
        Ok(())
    }

    #[test]
    fn default_config_logs_warnings_in_pretty_format() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
