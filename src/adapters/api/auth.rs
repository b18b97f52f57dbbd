//! Session Authentication — Bearer Token Handling
//!
//! Resolves credentials and caches the JWT the backend hands out at
//! login. Credentials come from `config.toml` or from the
//! `LETTERBOX_USERNAME` / `LETTERBOX_PASSWORD` environment variables;
//! the environment wins so secrets can stay out of committed files.
//!
//! Tokens expire server-side, so the cache is advisory: the client
//! drops it and logs in again when the backend turns a request away.

use anyhow::Result;
use tokio::sync::RwLock;

use super::ApiError;
use crate::config::ClientConfig;

/// A username/password pair for the login endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login username.
    pub username: String,
    /// Login password. Never logged.
    pub password: String,
}

/// Credential store plus cached bearer token.
pub struct SessionAuth {
    /// Resolved credentials, if any were configured.
    credentials: Option<Credentials>,
    /// Cached token from the last successful login.
    token: RwLock<Option<String>>,
}

impl SessionAuth {
    /// Build from explicit credential parts. Both must be present for
    /// the pair to count.
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };
        Self {
            credentials,
            token: RwLock::new(None),
        }
    }

    /// Resolve credentials from the environment, falling back to the
    /// config file.
    pub fn from_config(config: &ClientConfig) -> Self {
        let username = std::env::var("LETTERBOX_USERNAME")
            .ok()
            .or_else(|| config.username.clone());
        let password = std::env::var("LETTERBOX_PASSWORD")
            .ok()
            .or_else(|| config.password.clone());
        Self::new(username, password)
    }

    /// The configured credentials, or `MissingCredentials` when the
    /// caller needs them for an admin operation.
    pub fn credentials(&self) -> Result<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ApiError::MissingCredentials.into())
    }

    /// Whether a credential pair is available at all.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Last stored token, if any.
    pub async fn cached_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Remember a freshly issued token.
    pub async fn store_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Forget the cached token, forcing a login on the next use.
    pub async fn invalidate(&self) {
        *self.token.write().await = None;
    }
}
