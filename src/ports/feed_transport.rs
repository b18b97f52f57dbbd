//! Feed Transport Port - Live Event Stream Interface
//!
//! Defines the traits the live-feed supervisor uses to open and read
//! the letters event stream. The supervisor owns all retry and state
//! bookkeeping; implementors only move frames.

use async_trait::async_trait;

/// One frame read from an open event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A text payload, expected to hold one JSON-encoded letter.
    Text(String),
    /// A transport fault. The stream will end shortly after; the
    /// supervisor reports the error state and lets the close that
    /// follows drive the retry.
    Fault(String),
}

/// An open, readable event stream.
///
/// `next_frame` returning `None` means the stream closed, cleanly or
/// not. A faulty stream yields `Fault` first and then `None`, matching
/// how socket APIs fire an error event before the close event.
#[async_trait]
pub trait EventStream: Send {
    /// Wait for the next frame, or `None` once the stream is closed.
    async fn next_frame(&mut self) -> Option<StreamFrame>;
}

/// Trait for stream transport providers.
///
/// Implementors dial the given URL and hand back a live stream. Each
/// call opens a fresh connection; the supervisor never reuses streams
/// across attempts.
#[async_trait]
pub trait FeedTransport: Send + Sync + 'static {
    /// Open a new stream to `url`.
    async fn open(&self, url: &str) -> anyhow::Result<Box<dyn EventStream>>;
}
