//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml`. Endpoints,
//! retry budgets, and credentials are externalized here - nothing is
//! hardcoded in the domain layer. Credentials may also come from the
//! `LETTERBOX_USERNAME` / `LETTERBOX_PASSWORD` environment variables,
//! which take precedence over the file.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

/// Top-level client configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the client begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Client identity and credentials.
    #[serde(default)]
    pub client: ClientConfig,
    /// Backend REST API.
    pub api: ApiConfig,
    /// Live letter feed.
    pub feed: FeedConfig,
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Username for the admin endpoints. Only needed for sending.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for the admin endpoints. Only needed for sending.
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            username: None,
            password: None,
        }
    }
}

/// REST API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum retries for idempotent requests.
    #[serde(default = "default_api_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds (exponential backoff).
    #[serde(default = "default_api_retry_delay")]
    pub retry_base_delay_ms: u64,
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Retry base delay as a `Duration`.
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Live feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// WebSocket URL of the letters feed.
    pub ws_url: String,
    /// Reconnect attempts per connected period before giving up.
    #[serde(default = "default_feed_retries")]
    pub max_retries: u32,
    /// Backoff unit in milliseconds; retry n waits n times this long.
    #[serde(default = "default_feed_retry_delay")]
    pub retry_base_delay_ms: u64,
}

impl FeedConfig {
    /// Backoff unit as a `Duration`.
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_api_retries() -> u32 {
    3
}

fn default_api_retry_delay() -> u64 {
    250
}

fn default_feed_retries() -> u32 {
    5
}

fn default_feed_retry_delay() -> u64 {
    3000
}
