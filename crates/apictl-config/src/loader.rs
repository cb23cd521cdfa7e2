//! Configuration file discovery, loading, and saving.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{ConfigError, ConfigResult};
use crate::model::ConfigFile;

/// Default configuration location: `~/.apictl/config.json`, or
/// `./config.json` when no home directory is known.
#[must_use]
pub fn default_config_path() -> PathBuf {
    home_dir().map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
    )
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(env::var_os)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Read and decode the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] when the file cannot be read and
/// [`ConfigError::Parse`] when its contents are not a configuration object.
pub fn load(path: &Path) -> ConfigResult<ConfigFile> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded configuration file");
    Ok(file)
}

/// Like [`load`], but a missing file yields `Ok(None)`.
///
/// # Errors
///
/// Propagates every failure other than "not found".
pub fn load_optional(path: &Path) -> ConfigResult<Option<ConfigFile>> {
    match load(path) {
        Ok(file) => Ok(Some(file)),
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "configuration file not found");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Write `file` to `path` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::CreateDir`], [`ConfigError::Serialize`], or
/// [`ConfigError::Write`] depending on which step failed.
pub fn save(path: &Path, file: &ConfigFile) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut text =
        serde_json::to_string_pretty(file).map_err(|source| ConfigError::Serialize { source })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "saved configuration file");
    Ok(())
}
