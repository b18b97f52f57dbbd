//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FeedTransport` / `EventStream`: live letter event streaming
//! - `LetterStore`: mailbox access via the backend REST API
//! - `ViewRenderer` / `StatusReporter`: presentation sinks

pub mod feed_transport;
pub mod letter_store;
pub mod view;

pub use feed_transport::{EventStream, FeedTransport, StreamFrame};
pub use letter_store::LetterStore;
pub use view::{StatusReporter, ViewRenderer};
