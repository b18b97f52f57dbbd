//! View Port - Presentation Interface
//!
//! Defines the sinks the usecases push output through. The terminal
//! adapter implements both; tests substitute recorders.

use crate::domain::connection::ConnectionState;
use crate::domain::letter::Letter;

/// Sink for letters as they arrive or are fetched.
///
/// Rendering must be cheap and non-blocking; the live-feed supervisor
/// calls this inline from its event loop.
pub trait ViewRenderer: Send + Sync + 'static {
    /// Render one letter. Live and fetched letters share this path so
    /// both surfaces look identical.
    fn letter_received(&self, letter: &Letter);
}

/// Sink for connection lifecycle changes.
///
/// The supervisor guarantees consecutive calls always carry different
/// states, so implementors may render every call without deduplication.
pub trait StatusReporter: Send + Sync + 'static {
    /// Report that the feed entered `state`.
    fn status_changed(&self, state: ConnectionState);
}
