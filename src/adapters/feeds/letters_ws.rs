//! Letters WebSocket Transport — Live Feed Wire Adapter
//!
//! Connects to the backend's `/ws/letters` endpoint and adapts the
//! tungstenite message stream to the `EventStream` port. All retry and
//! state logic lives in the supervisor; this adapter only dials and
//! translates frames.
//!
//! The socket is polled whole, never split, so protocol pings from the
//! server are ponged as a side effect of reading.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::ports::feed_transport::{EventStream, FeedTransport, StreamFrame};

/// WebSocket implementation of the `FeedTransport` port.
pub struct WsTransport;

#[async_trait]
impl FeedTransport for WsTransport {
    async fn open(&self, url: &str) -> Result<Box<dyn EventStream>> {
        let (ws, _) = connect_async(url)
            .await
            .with_context(|| format!("WebSocket connection to {url} failed"))?;
        debug!(url, "WebSocket opened");
        Ok(Box::new(WsEventStream { ws, done: false }))
    }
}

/// One live WebSocket session.
struct WsEventStream {
    /// The connected socket.
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Set after a fault so the stream ends instead of being polled
    /// past the error.
    done: bool,
}

#[async_trait]
impl EventStream for WsEventStream {
    async fn next_frame(&mut self) -> Option<StreamFrame> {
        if self.done {
            return None;
        }

        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(StreamFrame::Text(text)),
                Some(Ok(Message::Close(_))) => {
                    debug!("WebSocket close frame received");
                    return None;
                }
                Some(Ok(Message::Ping(_))) => {
                    debug!("WebSocket ping received");
                }
                Some(Ok(_)) => {
                    // Binary and pong frames carry nothing for us.
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(StreamFrame::Fault(e.to_string()));
                }
                None => return None,
            }
        }
    }
}
