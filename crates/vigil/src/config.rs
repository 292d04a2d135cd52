use std::io::ErrorKind;

use tracing::debug;
use vigil_models::config::HarnessConfig;
use vigil_models::ProbeRequest;
use vigil_probe::http::build_url;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config/vigil.toml";
pub const BASE_URL_ENV: &str = "VIGIL_BASE_URL";

/// Load the harness configuration.
///
/// A missing file is only an error when the path was given explicitly; the
/// default path falls back to built-in defaults.
pub fn load_config(path: &str, explicit: bool) -> Result<HarnessConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
            debug!(path, "No config file, using defaults");
            return Ok(HarnessConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_string(),
                source,
            })
        }
    };

    let config: HarnessConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    if config.target.default_timeout_seconds == 0 {
        return Err(ConfigError::InvalidTimeout(
            "target.default_timeout_seconds".to_string(),
        ));
    }
    if config.target.connect_timeout_seconds == 0 {
        return Err(ConfigError::InvalidTimeout(
            "target.connect_timeout_seconds".to_string(),
        ));
    }
    Ok(())
}

/// Pick the base URL: `--base-url`, then `VIGIL_BASE_URL`, then the config
/// file. Blank values are ignored at every level.
pub fn resolve_base_url(
    config: &HarnessConfig,
    env_value: Option<String>,
    cli_value: Option<&str>,
) -> Result<String, ConfigError> {
    let candidate = cli_value
        .map(str::to_string)
        .into_iter()
        .chain(env_value)
        .chain(config.target.base_url.clone())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .ok_or(ConfigError::MissingBaseUrl)?;

    build_url(&candidate, &ProbeRequest::get("/"))
        .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
    Ok(candidate)
}
