//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the client's core workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `LiveFeed`: resilient letter stream with reconnect supervision
//! - `Inbox`: mailbox loading, lookup, and draft submission

pub mod inbox;
pub mod live_feed;

pub use inbox::Inbox;
pub use live_feed::LiveFeed;
