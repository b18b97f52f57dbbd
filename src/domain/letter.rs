//! Core mailbox domain types.
//!
//! Defines the entities the client exchanges with the letters API:
//! letters, drafts, and the user directory. These types are the inner
//! ring of the hexagonal architecture; ports and adapters move them
//! across the REST and WebSocket boundaries.
//!
//! Decoding is deliberately lenient. The backend is loosely schemad
//! (string timestamps without timezone, recipient fields that may be a
//! single address or a list), so every field tolerates absence and the
//! recipient fields accept both shapes. A letter that fails to decode
//! is dropped by the feed, never an error that tears the connection
//! down, so the decode surface must not reject valid traffic.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// Letter identifier as issued by the backend.
pub type LetterId = String;

/// Status string the backend stamps on fresh letters.
pub const STATUS_UNREAD: &str = "unread";

// ────────────────────────────────────────────
// Recipient handling
// ────────────────────────────────────────────

/// Recipient field that may arrive as one address or a list.
///
/// The backend emits `"to": ["a@example.com"]` but older records carry
/// a bare string, and `cc`/`bcc` show both shapes too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    /// Single bare address.
    One(String),
    /// List of addresses, possibly empty.
    Many(Vec<String>),
}

impl Recipients {
    /// Number of addresses.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(list) => list.len(),
        }
    }

    /// True when no address is present.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(addr) => addr.is_empty(),
            Self::Many(list) => list.is_empty(),
        }
    }

    /// Addresses joined with `", "` for display.
    pub fn join(&self) -> String {
        match self {
            Self::One(addr) => addr.clone(),
            Self::Many(list) => list.join(", "),
        }
    }
}

impl Default for Recipients {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

// ────────────────────────────────────────────
// Letters
// ────────────────────────────────────────────

/// A letter as stored and broadcast by the backend.
///
/// Every field defaults so partially filled records still decode; the
/// timestamp stays a plain string because the backend writes naive ISO
/// timestamps without a timezone suffix. Rendering attaches meaning,
/// not decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Letter {
    /// Backend-assigned identifier.
    pub id: LetterId,
    /// Primary recipients.
    pub to: Recipients,
    /// Sender address.
    #[serde(rename = "from")]
    pub sender: String,
    /// Carbon-copy recipients.
    pub cc: Recipients,
    /// Blind carbon-copy recipients.
    pub bcc: Recipients,
    /// Subject line.
    pub subject: String,
    /// Full message body.
    pub body: String,
    /// Naive ISO 8601 timestamp as the backend wrote it.
    pub timestamp: String,
    /// Lifecycle status string, `"unread"` on arrival.
    pub status: String,
}

impl Letter {
    /// Whether the backend still marks this letter unread.
    pub fn is_unread(&self) -> bool {
        self.status == STATUS_UNREAD
    }
}

/// An outgoing letter before the backend assigns id, timestamp, and
/// status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LetterDraft {
    /// Primary recipients, at least one required.
    pub to: Vec<String>,
    /// Sender address.
    #[serde(rename = "from")]
    pub sender: String,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl LetterDraft {
    /// Check the fields the backend requires before submission.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.to.is_empty(), "draft needs at least one recipient");
        anyhow::ensure!(!self.sender.is_empty(), "draft needs a sender address");
        anyhow::ensure!(!self.subject.is_empty(), "draft needs a subject");
        Ok(())
    }
}

// ────────────────────────────────────────────
// User directory
// ────────────────────────────────────────────

/// One addressable user in the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Correspondent {
    /// Address used on the wire.
    pub email: String,
    /// Human-readable name.
    pub name: String,
}

/// The directory served by `/users`: who may send and who may receive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDirectory {
    /// Accounts allowed in the `from` field.
    #[serde(rename = "from")]
    pub senders: Vec<Correspondent>,
    /// Accounts allowed in `to`, `cc`, and `bcc`.
    #[serde(rename = "to")]
    pub recipients: Vec<Correspondent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_decodes_full_record() {
        let raw = r#"{
            "id": "a1b2",
            "to": ["alice@example.com"],
            "from": "bob@example.com",
            "cc": [],
            "bcc": [],
            "subject": "Hello",
            "body": "Long time no see.",
            "timestamp": "2025-06-01T09:30:00",
            "status": "unread"
        }"#;
        let letter: Letter = serde_json::from_str(raw).unwrap();
        assert_eq!(letter.id, "a1b2");
        assert_eq!(letter.sender, "bob@example.com");
        assert_eq!(letter.to, Recipients::Many(vec!["alice@example.com".into()]));
        assert!(letter.is_unread());
    }

    #[test]
    fn test_letter_decodes_with_missing_fields() {
        let letter: Letter = serde_json::from_str(r#"{"subject": "bare"}"#).unwrap();
        assert_eq!(letter.subject, "bare");
        assert_eq!(letter.id, "");
        assert!(letter.to.is_empty());
        assert!(!letter.is_unread());
    }

    #[test]
    fn test_letter_accepts_bare_string_recipient() {
        let letter: Letter =
            serde_json::from_str(r#"{"to": "solo@example.com", "cc": ["x@example.com"]}"#)
                .unwrap();
        assert_eq!(letter.to, Recipients::One("solo@example.com".into()));
        assert_eq!(letter.cc.len(), 1);
    }

    #[test]
    fn test_letter_rejects_non_object() {
        assert!(serde_json::from_str::<Letter>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Letter>("\"oops\"").is_err());
    }

    #[test]
    fn test_recipients_join() {
        let many = Recipients::Many(vec!["a@x.com".into(), "b@x.com".into()]);
        assert_eq!(many.join(), "a@x.com, b@x.com");
        let one = Recipients::One("a@x.com".into());
        assert_eq!(one.join(), "a@x.com");
        assert_eq!(Recipients::default().join(), "");
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = LetterDraft {
            to: vec!["alice@example.com".into()],
            sender: "bob@example.com".into(),
            subject: "Hi".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());

        draft.to.clear();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_draft_serializes_from_key() {
        let draft = LetterDraft {
            to: vec!["alice@example.com".into()],
            sender: "bob@example.com".into(),
            subject: "Hi".into(),
            body: "text".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["from"], "bob@example.com");
        assert!(value.get("sender").is_none());
    }

    #[test]
    fn test_user_directory_decodes() {
        let raw = r#"{
            "from": [{"email": "admin@example.com", "name": "Admin"}],
            "to": [{"email": "alice@example.com", "name": "Alice"}]
        }"#;
        let dir: UserDirectory = serde_json::from_str(raw).unwrap();
        assert_eq!(dir.senders.len(), 1);
        assert_eq!(dir.recipients[0].name, "Alice");
    }
}
