//! Letters REST API Adapter
//!
//! Implements the HTTP client for the mailbox backend. Handles login,
//! letter listing and lookup, draft submission, and the user
//! directory.
//!
//! Sub-modules:
//! - `auth`: credential resolution and bearer token caching
//! - `client`: HTTP client with retries, implements `LetterStore`
//! - `types`: API request/response type definitions

pub mod auth;
pub mod client;
pub mod types;

use thiserror::Error;

use crate::domain::letter::LetterId;

/// Failures the backend expresses deliberately, as opposed to
/// transport trouble. Kept typed so callers can phrase them for the
/// user; everything else travels as plain `anyhow` context.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Login was rejected.
    #[error("invalid username or password")]
    InvalidCredentials,
    /// Lookup of an id the backend does not know.
    #[error("letter {0} not found")]
    LetterNotFound(LetterId),
    /// An admin operation was requested with no credentials configured.
    #[error("no credentials configured; set client.username and client.password")]
    MissingCredentials,
    /// Any other non-success response.
    #[error("backend rejected the request with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
}

pub use auth::SessionAuth;
pub use client::LettersClient;
