//! Domain layer - Core mailbox logic and models.
//!
//! This module contains the pure domain logic for the letterbox client.
//! No external I/O allowed here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod connection;
pub mod letter;

// Re-export core types for convenience
pub use connection::{ConnectionState, RetrySchedule};
pub use letter::{
    Correspondent, Letter, LetterDraft, LetterId, Recipients, UserDirectory,
};
