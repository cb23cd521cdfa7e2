//! CLI error type and the context shared by command handlers.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use apictl_client::{ApiClient, ClientError};
use apictl_config::{
    ClientConfig, ConfigError, ConfigOverrides, default_config_path, load_optional,
};
use apictl_models::ModelError;
use tracing::debug;

use crate::cli::{GlobalArgs, OutputFormat};

/// Exit status for every failed invocation.
pub(crate) const EXIT_FAILURE: i32 = 1;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        if err.is_local() {
            Self::Validation(err.to_string())
        } else {
            Self::Failure(err.into())
        }
    }
}

impl From<ModelError> for CliError {
    fn from(err: ModelError) -> Self {
        ClientError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingBaseUrl | ConfigError::InvalidBaseUrl { .. } => {
                Self::Validation(err.to_string())
            }
            other => Self::Failure(other.into()),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: ApiClient,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Resolve configuration and build the HTTP client for this invocation.
    pub(crate) fn from_globals(globals: &GlobalArgs, trace_id: &str) -> CliResult<Self> {
        let config = resolve_config(globals)?;
        debug!(base_url = %config.base_url, prefix = %config.api_prefix, "resolved configuration");
        let client = ApiClient::new(&config, Duration::from_secs(globals.timeout), trace_id)?;
        Ok(Self {
            client,
            output: globals.output,
        })
    }
}

/// Path of the configuration file for this invocation.
pub(crate) fn config_path(globals: &GlobalArgs) -> PathBuf {
    globals.config.clone().unwrap_or_else(default_config_path)
}

/// Merge the configuration file with flag and environment overrides.
pub(crate) fn resolve_config(globals: &GlobalArgs) -> CliResult<ClientConfig> {
    let file = load_optional(&config_path(globals))?.unwrap_or_default();
    Ok(file.resolve(ConfigOverrides {
        base_url: globals.base_url.clone(),
        api_key: globals.api_key.clone(),
    })?)
}
