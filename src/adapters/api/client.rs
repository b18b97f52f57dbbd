//! Letters HTTP Client - Backend REST API Client
//!
//! Wraps reqwest with retries and bearer authentication for all
//! mailbox REST interactions. Reads retry transient failures with
//! exponential backoff; the letter-creating POST is sent exactly once
//! so a slow backend can never be tricked into storing duplicates.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::auth::SessionAuth;
use super::types::{LoginResponse, SendReceipt};
use super::ApiError;
use crate::config::ApiConfig;
use crate::domain::letter::{Letter, LetterDraft, LetterId, UserDirectory};
use crate::ports::letter_store::LetterStore;

/// HTTP client for the letters backend. Implements the `LetterStore`
/// port.
pub struct LettersClient {
    /// Underlying HTTP client.
    http: Client,
    /// Base URL including the `/api` prefix, no trailing slash.
    base_url: String,
    /// Maximum retries for idempotent requests.
    max_retries: u32,
    /// Base delay between retries (exponential backoff).
    retry_base_delay: Duration,
    /// Credential and token manager.
    auth: SessionAuth,
}

impl LettersClient {
    /// Create a new client from API config and resolved credentials.
    pub fn new(config: &ApiConfig, auth: SessionAuth) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(2)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay(),
            auth,
        })
    }

    /// Log in and cache the bearer token. Rejected credentials map to
    /// `InvalidCredentials` regardless of which 4xx the backend picked.
    pub async fn login(&self) -> Result<String> {
        let creds = self.auth.credentials()?;
        let url = format!("{}/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("username", creds.username.as_str()),
                ("password", creds.password.as_str()),
            ])
            .send()
            .await
            .context("Login request failed")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::InvalidCredentials.into());
        }

        let response = Self::check_ok(response).await?;
        let login: LoginResponse = response
            .json()
            .await
            .context("Malformed login response")?;
        self.auth.store_token(login.access_token.clone()).await;
        info!("Logged in to the letters API");
        Ok(login.access_token)
    }

    /// Execute a GET with retries on transport failures and 5xx.
    /// Returns whatever non-5xx response finally arrived; the caller
    /// maps statuses.
    async fn get_with_retry(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying request");
                sleep(delay).await;
            }

            match self.http.get(&url).send().await {
                Ok(response) if response.status().is_server_error() => {
                    warn!(status = %response.status(), path, "Server error, retrying");
                    last_error = Some(anyhow::anyhow!(
                        "server error {} from {path}",
                        response.status()
                    ));
                }
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(error = %e, attempt, path, "Request failed");
                    last_error = Some(anyhow::Error::from(e).context(format!("GET {path}")));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("request retries exhausted")))
    }

    /// Map any non-success status to a typed rejection.
    async fn check_ok(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Rejected {
            status: status.as_u16(),
            body,
        }
        .into())
    }

    /// POST the draft as form fields. The backend reads classic form
    /// encoding: list fields travel comma-joined and the sender key is
    /// literally `from_`.
    async fn post_letter(&self, draft: &LetterDraft, token: &str) -> Result<Response> {
        let url = format!("{}/letters", self.base_url);
        let form: Vec<(&str, String)> = vec![
            ("to", draft.to.join(",")),
            ("from_", draft.sender.clone()),
            ("cc", draft.cc.join(",")),
            ("bcc", draft.bcc.join(",")),
            ("subject", draft.subject.clone()),
            ("body", draft.body.clone()),
        ];

        self.http
            .post(&url)
            .bearer_auth(token)
            .form(&form)
            .send()
            .await
            .context("Send letter request failed")
    }
}

#[async_trait]
impl LetterStore for LettersClient {
    async fn list_letters(&self) -> Result<Vec<Letter>> {
        let response = self.get_with_retry("/letters").await?;
        let response = Self::check_ok(response).await?;
        response
            .json::<Vec<Letter>>()
            .await
            .context("Malformed letters listing")
    }

    async fn get_letter(&self, id: &LetterId) -> Result<Letter> {
        let response = self.get_with_retry(&format!("/letters/{id}")).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::LetterNotFound(id.clone()).into());
        }
        let response = Self::check_ok(response).await?;
        response
            .json::<Letter>()
            .await
            .context("Malformed letter record")
    }

    async fn send_letter(&self, draft: &LetterDraft) -> Result<LetterId> {
        let cached = self.auth.cached_token().await;
        let had_cache = cached.is_some();
        let token = match cached {
            Some(token) => token,
            None => self.login().await?,
        };

        let mut response = self.post_letter(draft, &token).await?;

        // A cached token may have expired server-side. One fresh login,
        // one more try; a rejection after that is real.
        if had_cache
            && matches!(
                response.status(),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            )
        {
            debug!("Cached token rejected, logging in again");
            self.auth.invalidate().await;
            let token = self.login().await?;
            response = self.post_letter(draft, &token).await?;
        }

        let response = Self::check_ok(response).await?;
        let receipt: SendReceipt = response
            .json()
            .await
            .context("Malformed send receipt")?;
        Ok(receipt.id)
    }

    async fn list_users(&self) -> Result<UserDirectory> {
        let response = self.get_with_retry("/users").await?;
        let response = Self::check_ok(response).await?;
        response
            .json::<UserDirectory>()
            .await
            .context("Malformed user directory")
    }
}
