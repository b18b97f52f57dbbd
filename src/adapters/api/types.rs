//! Letters API Request/Response Types
//!
//! Defines the serialization types for talking to the mailbox
//! backend. Letters themselves live in the domain layer; these are
//! the envelope types around them.

use serde::Deserialize;

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the admin endpoints.
    pub access_token: String,
}

/// Acknowledgement returned when a letter is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct SendReceipt {
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: String,
    /// Id assigned to the stored letter.
    pub id: String,
}
