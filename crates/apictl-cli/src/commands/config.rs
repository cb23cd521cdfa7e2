use apictl_config::{ClientConfig, DEFAULT_API_PREFIX, save};
use serde_json::{Value, json};

use crate::cli::{ConfigInitArgs, GlobalArgs, OutputFormat};
use crate::client::{CliError, CliResult, config_path, resolve_config};
use crate::output::{pretty_json, render_table};

const REDACTED: &str = "********";

/// Write the configuration file from the global flags.
pub(crate) fn handle_config_init(globals: &GlobalArgs, args: &ConfigInitArgs) -> CliResult<()> {
    let base_url = globals.base_url.as_deref().ok_or_else(|| {
        CliError::validation("config init requires --base-url (or APICTL_BASE_URL)")
    })?;
    let config = ClientConfig::new(
        base_url,
        globals.api_key.clone(),
        args.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX),
    )?;
    let path = config_path(globals);
    save(&path, &config.to_file())?;
    println!("Configuration written to {}.", path.display());
    Ok(())
}

/// Print the effective configuration with the API key redacted.
pub(crate) fn handle_config_show(globals: &GlobalArgs) -> CliResult<()> {
    let config = resolve_config(globals)?;
    let summary = effective_config(globals, &config);
    match globals.output {
        OutputFormat::Json => println!("{}", pretty_json(&summary)?),
        OutputFormat::Table => {
            let rows = summary
                .as_object()
                .into_iter()
                .flatten()
                .map(|(key, value)| {
                    vec![
                        key.clone(),
                        value.as_str().map_or_else(|| "-".to_string(), str::to_string),
                    ]
                })
                .collect::<Vec<_>>();
            println!("{}", render_table(&["setting", "value"], &rows));
        }
    }
    Ok(())
}

fn effective_config(globals: &GlobalArgs, config: &ClientConfig) -> Value {
    json!({
        "config_file": config_path(globals).display().to_string(),
        "base_url": config.base_url.as_str(),
        "api_prefix": config.api_prefix,
        "api_key": config.api_key.as_ref().map(|_| REDACTED),
    })
}
