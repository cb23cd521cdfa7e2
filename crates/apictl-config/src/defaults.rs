//! Default values shared by the loader and the CLI.

/// Path segment under which JSON:API collections are served.
pub const DEFAULT_API_PREFIX: &str = "api";
/// Per-request timeout applied when no override is given.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Directory under the user's home that holds the configuration file.
pub(crate) const CONFIG_DIR_NAME: &str = ".apictl";
/// Configuration file name.
pub(crate) const CONFIG_FILE_NAME: &str = "config.json";
