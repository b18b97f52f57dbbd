//! Letter Store Port - Mailbox API Interface
//!
//! Defines the trait for reading and writing letters through the
//! backend REST API. The HTTP adapter implements it; usecases and the
//! CLI depend only on this trait.

use async_trait::async_trait;

use crate::domain::letter::{Letter, LetterDraft, LetterId, UserDirectory};

/// Trait for mailbox storage providers.
///
/// All methods are request-scoped: no connection state is held between
/// calls. Authentication happens out of band and is an implementation
/// concern of the adapter.
#[async_trait]
pub trait LetterStore: Send + Sync + 'static {
    /// Fetch every letter in the mailbox, oldest first as the backend
    /// returns them.
    async fn list_letters(&self) -> anyhow::Result<Vec<Letter>>;

    /// Fetch a single letter by id.
    async fn get_letter(&self, id: &LetterId) -> anyhow::Result<Letter>;

    /// Submit a draft. Returns the backend-assigned letter id; the
    /// stored record itself arrives over the live feed broadcast.
    async fn send_letter(&self, draft: &LetterDraft) -> anyhow::Result<LetterId>;

    /// Fetch the directory of allowed senders and recipients.
    async fn list_users(&self) -> anyhow::Result<UserDirectory>;
}
