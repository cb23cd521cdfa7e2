//! Command handlers grouped by concern.

pub(crate) mod actions;
pub(crate) mod config;
pub(crate) mod describe;
pub(crate) mod permissions;
pub(crate) mod relations;
pub(crate) mod resources;

use apictl_models::Object;
use serde_json::Value;

use crate::client::{CliError, CliResult};

/// Parse a `--flag` value that must be a JSON object.
pub(crate) fn parse_json_object(flag: &str, raw: &str) -> CliResult<Object> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(CliError::validation(format!(
            "--{flag} must be a JSON object"
        ))),
        Err(err) => Err(CliError::validation(format!(
            "--{flag} is not valid JSON: {err}"
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use anyhow::Result;
    use apictl_client::ApiClient;
    use apictl_config::ClientConfig;
    use httpmock::MockServer;

    use crate::cli::OutputFormat;
    use crate::client::AppContext;

    pub(crate) fn context_with(server: &MockServer, output: OutputFormat) -> Result<AppContext> {
        let config = ClientConfig::new(&server.base_url(), Some("token".into()), "api")?;
        Ok(AppContext {
            client: ApiClient::new(&config, Duration::from_secs(5), "trace-test")?,
            output,
        })
    }

    pub(crate) fn context(server: &MockServer) -> Result<AppContext> {
        context_with(server, OutputFormat::Table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_flags_reject_other_shapes() {
        assert!(parse_json_object("attributes", r#"{"title":"x"}"#).is_ok());
        for raw in ["[1]", "\"text\"", "{oops"] {
            let err = parse_json_object("attributes", raw).expect_err(raw);
            assert!(matches!(err, CliError::Validation(ref message) if message.starts_with("--attributes")));
        }
    }
}
