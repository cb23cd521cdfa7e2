//! Configuration models.
//!
//! # Design
//! - `ConfigFile` mirrors the JSON file exactly; every member is optional so a
//!   partial file can be merged with flags before validation.
//! - `ClientConfig` is the validated result handed to the HTTP client.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::DEFAULT_API_PREFIX;
use crate::error::{ConfigError, ConfigResult};

/// On-disk configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Root URL of the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Static bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Path segment under which JSON:API collections live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_prefix: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `base_url` from the file.
    pub base_url: Option<String>,
    /// Replaces `api_key` from the file.
    pub api_key: Option<String>,
}

/// Validated configuration used to build the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute base URL, always ending in `/`.
    pub base_url: Url,
    /// Bearer token sent on every request when present.
    pub api_key: Option<String>,
    /// Collection prefix without leading or trailing slashes (may be empty).
    pub api_prefix: String,
}

impl ConfigFile {
    /// Merge `overrides` over the file values and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] when neither source provides a
    /// base URL, or [`ConfigError::InvalidBaseUrl`] when it does not parse.
    pub fn resolve(self, overrides: ConfigOverrides) -> ConfigResult<ClientConfig> {
        let base_url = overrides
            .base_url
            .or(self.base_url)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let api_key = overrides
            .api_key
            .or(self.api_key)
            .filter(|value| !value.trim().is_empty());

        ClientConfig::new(
            &base_url,
            api_key,
            self.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX),
        )
    }
}

impl ClientConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when `base_url` is not an
    /// absolute `http` or `https` URL.
    pub fn new(base_url: &str, api_key: Option<String>, api_prefix: &str) -> ConfigResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_key,
            api_prefix: api_prefix.trim().trim_matches('/').to_string(),
        })
    }

    /// File representation of this configuration.
    #[must_use]
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            base_url: Some(self.base_url.to_string()),
            api_key: self.api_key.clone(),
            api_prefix: Some(self.api_prefix.clone()),
        }
    }
}

fn normalize_base_url(raw: &str) -> ConfigResult<Url> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
