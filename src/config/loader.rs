//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    validate_config(&config)?;

    info!(
        api = %config.api.base_url,
        feed = %config.feed.ws_url,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Endpoint URLs present with usable schemes
/// - Non-zero timing values
/// - Credentials given as a complete pair or not at all
fn validate_config(config: &AppConfig) -> Result<()> {
    // API validation
    anyhow::ensure!(
        !config.api.base_url.is_empty(),
        "API base_url must not be empty"
    );
    anyhow::ensure!(
        config.api.base_url.starts_with("http://")
            || config.api.base_url.starts_with("https://"),
        "API base_url must start with http:// or https://, got {}",
        config.api.base_url
    );
    anyhow::ensure!(
        config.api.timeout_seconds > 0,
        "API timeout_seconds must be positive"
    );
    anyhow::ensure!(
        config.api.retry_base_delay_ms > 0,
        "API retry_base_delay_ms must be positive"
    );

    // Feed validation
    anyhow::ensure!(
        !config.feed.ws_url.is_empty(),
        "Feed ws_url must not be empty"
    );
    anyhow::ensure!(
        config.feed.ws_url.starts_with("ws://") || config.feed.ws_url.starts_with("wss://"),
        "Feed ws_url must start with ws:// or wss://, got {}",
        config.feed.ws_url
    );
    anyhow::ensure!(
        config.feed.retry_base_delay_ms > 0,
        "Feed retry_base_delay_ms must be positive"
    );

    // Credential validation: both halves or neither
    anyhow::ensure!(
        config.client.username.is_some() == config.client.password.is_some(),
        "client username and password must be configured together"
    );

    Ok(())
}
