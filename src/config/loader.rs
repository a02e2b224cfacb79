//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the backend base URL.
pub const BACKEND_URL_ENV: &str = "API_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// `API_URL` is applied on top of the file before validation.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_backend_url_override(&mut config, std::env::var(BACKEND_URL_ENV).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the configuration used when no file is given: defaults plus `API_URL`.
pub fn config_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();

    apply_backend_url_override(&mut config, std::env::var(BACKEND_URL_ENV).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Replace the backend base URL when an override is present and non-empty.
pub fn apply_backend_url_override(config: &mut GatewayConfig, value: Option<String>) {
    if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        tracing::debug!(base_url = %url, "Backend URL overridden");
        config.backend.base_url = url;
    }
}
