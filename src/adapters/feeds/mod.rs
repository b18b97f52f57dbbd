//! Live Feed Adapters - Letter Event Streaming
//!
//! Provides the WebSocket transport behind the `FeedTransport` port.
//! The reconnect supervisor in the usecases layer drives it.

pub mod letters_ws;

pub use letters_ws::WsTransport;
