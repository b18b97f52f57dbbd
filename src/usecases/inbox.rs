//! Inbox - Mailbox Read and Compose Operations
//!
//! Mediates between the CLI and the letter store:
//! - Loading the full mailbox and rendering it through the view
//! - Fetching a single letter by id
//! - Validating and submitting drafts
//! - Listing the user directory for address completion
//!
//! The initial mailbox load shares the same render path as the live
//! feed, so a letter looks identical whether it was fetched or pushed.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument};

use crate::domain::letter::{Letter, LetterDraft, LetterId, UserDirectory};
use crate::ports::letter_store::LetterStore;
use crate::ports::view::ViewRenderer;

/// Mailbox operations over the letter store port.
pub struct Inbox<S: LetterStore, V: ViewRenderer> {
    /// Backend access.
    store: Arc<S>,
    /// Letter sink shared with the live feed.
    view: Arc<V>,
}

impl<S: LetterStore, V: ViewRenderer> Inbox<S, V> {
    /// Create a new inbox over the given store and view.
    pub fn new(store: Arc<S>, view: Arc<V>) -> Self {
        Self { store, view }
    }

    /// Fetch every letter and render each through the view, in backend
    /// order. Returns how many letters were rendered.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<usize> {
        let letters = self.store.list_letters().await?;
        for letter in &letters {
            self.view.letter_received(letter);
        }
        info!(count = letters.len(), "Mailbox loaded");
        Ok(letters.len())
    }

    /// Fetch one letter by id.
    pub async fn fetch(&self, id: &LetterId) -> Result<Letter> {
        self.store.get_letter(id).await
    }

    /// Validate and submit a draft. Returns the id the backend assigned
    /// to the stored letter.
    #[instrument(skip(self, draft), fields(subject = %draft.subject))]
    pub async fn send(&self, draft: &LetterDraft) -> Result<LetterId> {
        draft.validate()?;
        let id = self.store.send_letter(draft).await?;
        info!(id = %id, "Letter sent");
        Ok(id)
    }

    /// Fetch the directory of allowed senders and recipients.
    pub async fn users(&self) -> Result<UserDirectory> {
        self.store.list_users().await
    }
}
