//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The configuration file was not valid JSON for the expected shape.
    #[error("configuration file {} is not valid", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source decoder error.
        source: serde_json::Error,
    },
    /// The configuration could not be encoded.
    #[error("failed to encode configuration")]
    Serialize {
        /// Source encoder error.
        source: serde_json::Error,
    },
    /// The parent directory of the configuration file could not be created.
    #[error("failed to create configuration directory {}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The configuration file could not be written.
    #[error("failed to write configuration file {}", .path.display())]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// No base URL was supplied by the file, the environment, or a flag.
    #[error("base_url is not configured (set it in the config file or pass --base-url)")]
    MissingBaseUrl,
    /// The base URL was not an absolute http(s) URL.
    #[error("invalid base_url '{value}': {reason}")]
    InvalidBaseUrl {
        /// Value as supplied.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
