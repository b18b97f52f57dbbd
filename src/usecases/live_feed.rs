//! Live Feed - Resilient Letter Stream Supervisor
//!
//! The main live-update use case that:
//! 1. Opens the letters event stream via `FeedTransport`
//! 2. Decodes incoming frames and pushes letters to the `ViewRenderer`
//! 3. Reports every connection state change through `StatusReporter`
//! 4. Reconnects with bounded linear backoff after drops
//! 5. Honors visibility nudges that bypass the wait or revive an
//!    exhausted feed
//!
//! All state lives in one supervisor task; the public handle only sends
//! commands. That makes the timer story trivial: at most one backoff
//! sleep can exist, and dropping the select arm cancels it.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::FeedConfig;
use crate::domain::connection::{ConnectionState, RetrySchedule};
use crate::domain::letter::Letter;
use crate::ports::feed_transport::{FeedTransport, StreamFrame};
use crate::ports::view::{StatusReporter, ViewRenderer};

/// Command sent from the public handle to the supervisor task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedCommand {
    /// Start the feed, or retry immediately if it is down.
    Connect,
    /// The user is looking again; same effect as `Connect` but logged
    /// separately. Does not refill the retry budget.
    Visible,
    /// Tear everything down. The supervisor exits after this.
    Close,
}

/// How a single connect attempt ended.
enum AttemptEnd {
    /// Stream dropped or never opened; the caller decides on a retry.
    Dropped,
    /// A close arrived or the handle went away.
    Shutdown,
}

/// How a connect-retry cycle ended.
enum CycleEnd {
    /// Retry budget spent; the feed idles until the next nudge.
    Exhausted,
    /// A close arrived or the handle went away.
    Shutdown,
}

/// Handle to the live letter feed.
///
/// Cheap to share behind an `Arc`. `connect` and `notify_visible` are
/// fire-and-forget; `close` waits for the supervisor to finish so the
/// caller knows no timer or socket survives it. Calling `close` twice,
/// or nudging a closed feed, is harmless.
pub struct LiveFeed {
    /// Command channel into the supervisor task.
    cmd_tx: mpsc::UnboundedSender<FeedCommand>,
    /// Supervisor task handle, taken by the first `close`.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LiveFeed {
    /// Spawn the supervisor task. The feed starts disconnected and
    /// silent; nothing happens until `connect` is called.
    pub fn new<T, V, S>(
        transport: Arc<T>,
        view: Arc<V>,
        status: Arc<S>,
        config: &FeedConfig,
    ) -> Self
    where
        T: FeedTransport,
        V: ViewRenderer,
        S: StatusReporter,
    {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let supervisor = Supervisor {
            transport,
            view,
            status,
            url: config.ws_url.clone(),
            schedule: RetrySchedule::new(config.retry_base_delay(), config.max_retries),
            last_reported: ConnectionState::Disconnected,
            cmd_rx,
        };
        let task = tokio::spawn(supervisor.run());
        Self {
            cmd_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Start the feed. If it is waiting out a backoff delay this skips
    /// the wait; if it is already connecting or connected it is a no-op.
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(FeedCommand::Connect);
    }

    /// Nudge the feed because the user is paying attention again.
    ///
    /// Revives a feed that gave up after exhausting its retries and
    /// shortcuts a pending backoff wait. The retry budget itself only
    /// refills on a successful connect.
    pub fn notify_visible(&self) {
        let _ = self.cmd_tx.send(FeedCommand::Visible);
    }

    /// Shut the feed down and wait until the supervisor has exited.
    ///
    /// Guarantees no reconnect fires afterwards: the backoff sleep is
    /// dropped with the supervisor's select arm. Safe to call more than
    /// once; later calls return immediately.
    pub async fn close(&self) {
        let _ = self.cmd_tx.send(FeedCommand::Close);
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Feed supervisor task panicked");
            }
        }
    }
}

/// Owns the connection state machine. Runs as a single tokio task.
struct Supervisor<T, V, S> {
    /// Stream transport.
    transport: Arc<T>,
    /// Letter sink.
    view: Arc<V>,
    /// State change sink.
    status: Arc<S>,
    /// Stream endpoint.
    url: String,
    /// Linear backoff budget.
    schedule: RetrySchedule,
    /// Last state pushed to the reporter, for deduplication.
    last_reported: ConnectionState,
    /// Command channel from the handle.
    cmd_rx: mpsc::UnboundedReceiver<FeedCommand>,
}

impl<T, V, S> Supervisor<T, V, S>
where
    T: FeedTransport,
    V: ViewRenderer,
    S: StatusReporter,
{
    /// Outer idle loop: wait for a start command, drive a cycle, and
    /// when the cycle exhausts its retries go back to waiting. Exits on
    /// close or when the handle is dropped, always reporting a final
    /// `Disconnected`.
    #[instrument(skip(self), name = "live_feed")]
    async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                FeedCommand::Connect | FeedCommand::Visible => {
                    debug!(?cmd, "Feed start requested");
                    if let CycleEnd::Shutdown = self.drive().await {
                        break;
                    }
                    info!(
                        attempts = self.schedule.max_attempts(),
                        "Retry budget exhausted, feed idle until next nudge"
                    );
                }
                FeedCommand::Close => break,
            }
        }
        self.transition(ConnectionState::Disconnected);
        debug!("Feed supervisor stopped");
    }

    /// One connect-retry cycle: attempt, and on failure wait out the
    /// linear backoff before the next attempt, until the budget is
    /// spent. A command during the wait either shortcuts it or shuts
    /// the cycle down; the pending sleep is dropped either way.
    async fn drive(&mut self) -> CycleEnd {
        loop {
            self.transition(ConnectionState::Connecting);
            if let AttemptEnd::Shutdown = self.attempt().await {
                return CycleEnd::Shutdown;
            }

            let Some(delay) = self.schedule.next_delay() else {
                return CycleEnd::Exhausted;
            };
            info!(
                delay_ms = delay.as_millis() as u64,
                attempt = self.schedule.attempts(),
                "Feed down, reconnecting after backoff"
            );

            tokio::select! {
                biased;
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(FeedCommand::Close) | None => return CycleEnd::Shutdown,
                    Some(trigger) => {
                        debug!(?trigger, "Backoff wait skipped");
                    }
                },
                _ = tokio::time::sleep(delay) => {},
            }
        }
    }

    /// A single connect attempt and, if it opens, the whole session
    /// that follows. Returns once the stream is gone.
    async fn attempt(&mut self) -> AttemptEnd {
        // Commands may arrive while the dial is in flight. Close wins;
        // further start requests are already satisfied. The dial future
        // borrows the transport, so it lives in its own scope.
        let opened = {
            let open = self.transport.open(&self.url);
            tokio::pin!(open);
            loop {
                tokio::select! {
                    biased;
                    cmd = self.cmd_rx.recv() => match cmd {
                        Some(FeedCommand::Close) | None => return AttemptEnd::Shutdown,
                        Some(_) => {}
                    },
                    opened = &mut open => break opened,
                }
            }
        };

        let mut stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                // A failed dial surfaces as an error followed by a
                // close, the same double signal a socket would emit.
                warn!(error = %e, url = %self.url, "Feed connection failed");
                self.transition(ConnectionState::Errored);
                self.transition(ConnectionState::Disconnected);
                return AttemptEnd::Dropped;
            }
        };

        info!(url = %self.url, "Letter feed connected");
        self.transition(ConnectionState::Connected);
        self.schedule.reset();

        loop {
            tokio::select! {
                biased;
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(FeedCommand::Close) | None => return AttemptEnd::Shutdown,
                    Some(trigger) => {
                        debug!(?trigger, "Feed already connected, nudge ignored");
                    }
                },
                frame = stream.next_frame() => match frame {
                    Some(StreamFrame::Text(text)) => self.handle_frame(&text),
                    Some(StreamFrame::Fault(reason)) => {
                        warn!(reason = %reason, "Letter feed errored");
                        self.transition(ConnectionState::Errored);
                    }
                    None => {
                        info!("Letter feed closed");
                        self.transition(ConnectionState::Disconnected);
                        return AttemptEnd::Dropped;
                    }
                },
            }
        }
    }

    /// Decode one frame and hand the letter to the view. Malformed
    /// payloads are logged and dropped; they never touch the connection
    /// state.
    fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<Letter>(text) {
            Ok(letter) => {
                debug!(id = %letter.id, sender = %letter.sender, "Letter received");
                self.view.letter_received(&letter);
            }
            Err(e) => {
                debug!(error = %e, "Dropping malformed feed payload");
            }
        }
    }

    /// Push a state change, skipping repeats so the reporter never sees
    /// the same state twice in a row.
    fn transition(&mut self, state: ConnectionState) {
        if state == self.last_reported {
            return;
        }
        self.last_reported = state;
        self.status.status_changed(state);
    }
}
