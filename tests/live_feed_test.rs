//! Live Feed Tests - Reconnect Supervisor Scenarios
//!
//! Drives the `LiveFeed` supervisor against a scripted transport and
//! recording sinks, on a paused tokio clock so backoff timing is
//! asserted exactly. Each script entry describes how one connect
//! attempt plays out; an attempt past the end of the script fails the
//! test through the recorded open count.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use letterbox::config::FeedConfig;
use letterbox::domain::connection::ConnectionState;
use letterbox::domain::letter::Letter;
use letterbox::ports::feed_transport::{EventStream, FeedTransport, StreamFrame};
use letterbox::ports::view::{StatusReporter, ViewRenderer};
use letterbox::usecases::LiveFeed;

// ---- Scripted transport ----

/// How one connect attempt plays out.
enum Attempt {
    /// The dial fails outright.
    Refused,
    /// The dial succeeds, the stream yields these frames, then closes.
    Session(Vec<StreamFrame>),
    /// The dial succeeds and the stream stays open forever.
    Hold,
}

/// Transport whose attempts follow a pre-written script, recording
/// when each dial happened on the paused test clock.
struct ScriptedTransport {
    script: Mutex<VecDeque<Attempt>>,
    opens: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Attempt>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            opens: Mutex::new(Vec::new()),
        })
    }

    fn open_instants(&self) -> Vec<Instant> {
        self.opens.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedTransport for ScriptedTransport {
    async fn open(&self, _url: &str) -> anyhow::Result<Box<dyn EventStream>> {
        self.opens.lock().unwrap().push(Instant::now());
        let attempt = self.script.lock().unwrap().pop_front();
        match attempt {
            Some(Attempt::Refused) => Err(anyhow::anyhow!("connection refused")),
            Some(Attempt::Session(frames)) => Ok(Box::new(ScriptedStream {
                frames: frames.into(),
                hold: false,
            })),
            Some(Attempt::Hold) => Ok(Box::new(ScriptedStream {
                frames: VecDeque::new(),
                hold: true,
            })),
            None => Err(anyhow::anyhow!("connect attempt past end of script")),
        }
    }
}

struct ScriptedStream {
    frames: VecDeque<StreamFrame>,
    hold: bool,
}

#[async_trait]
impl EventStream for ScriptedStream {
    async fn next_frame(&mut self) -> Option<StreamFrame> {
        if let Some(frame) = self.frames.pop_front() {
            return Some(frame);
        }
        if self.hold {
            std::future::pending::<()>().await;
        }
        None
    }
}

// ---- Recording sinks ----

#[derive(Default)]
struct RecordingView {
    ids: Mutex<Vec<String>>,
}

impl ViewRenderer for RecordingView {
    fn letter_received(&self, letter: &Letter) {
        self.ids.lock().unwrap().push(letter.id.clone());
    }
}

#[derive(Default)]
struct RecordingStatus {
    states: Mutex<Vec<ConnectionState>>,
}

impl RecordingStatus {
    fn seen(&self) -> Vec<ConnectionState> {
        self.states.lock().unwrap().clone()
    }
}

impl StatusReporter for RecordingStatus {
    fn status_changed(&self, state: ConnectionState) {
        self.states.lock().unwrap().push(state);
    }
}

// ---- Helpers ----

fn feed_config(max_retries: u32, base_delay_ms: u64) -> FeedConfig {
    FeedConfig {
        ws_url: "ws://test.invalid/ws/letters".into(),
        max_retries,
        retry_base_delay_ms: base_delay_ms,
    }
}

fn letter_json(id: &str) -> StreamFrame {
    StreamFrame::Text(format!(
        r#"{{"id": "{id}", "from": "bob@example.com", "subject": "hi", "status": "unread"}}"#
    ))
}

/// Let the supervisor run to quiescence on the paused clock.
async fn settle() {
    tokio::time::sleep(Duration::from_secs(3600)).await;
}

/// The reporter must never see the same state twice in a row.
fn assert_no_repeats(states: &[ConnectionState]) {
    for pair in states.windows(2) {
        assert_ne!(pair[0], pair[1], "duplicate status report in {states:?}");
    }
}

// ---- Scenarios ----

#[tokio::test(start_paused = true)]
async fn test_letters_delivered_in_order_malformed_skipped() {
    let transport = ScriptedTransport::new(vec![Attempt::Session(vec![
        letter_json("a"),
        letter_json("b"),
        letter_json("c"),
        StreamFrame::Text("this is not json".into()),
        letter_json("d"),
    ])]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        Arc::clone(&view),
        Arc::clone(&status),
        &feed_config(0, 100),
    );
    feed.connect();
    settle().await;
    feed.close().await;

    // All four valid letters, in arrival order, malformed one dropped.
    assert_eq!(*view.ids.lock().unwrap(), vec!["a", "b", "c", "d"]);
    // The malformed message never touched connection state.
    let states = status.seen();
    assert_eq!(
        states,
        vec![
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Disconnected,
        ]
    );
    assert_eq!(transport.open_instants().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_grows_linearly_then_gives_up() {
    let transport =
        ScriptedTransport::new(vec![Attempt::Refused, Attempt::Refused, Attempt::Refused]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        view,
        Arc::clone(&status),
        &feed_config(2, 100),
    );
    feed.connect();
    settle().await;

    // Initial attempt plus two retries: waits of 100ms then 200ms.
    let opens = transport.open_instants();
    assert_eq!(opens.len(), 3, "no attempt may fire past the retry budget");
    assert_eq!(opens[1] - opens[0], Duration::from_millis(100));
    assert_eq!(opens[2] - opens[1], Duration::from_millis(200));

    // Every failure reports error then disconnect; the feed ends idle.
    let states = status.seen();
    assert_no_repeats(&states);
    assert_eq!(states.last(), Some(&ConnectionState::Disconnected));

    feed.close().await;
    assert_eq!(transport.open_instants().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_visibility_nudge_revives_exhausted_feed() {
    let transport =
        ScriptedTransport::new(vec![Attempt::Refused, Attempt::Refused, Attempt::Hold]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        view,
        Arc::clone(&status),
        &feed_config(1, 100),
    );
    feed.connect();
    settle().await;

    // Budget of one retry is spent; the feed idles disconnected.
    assert_eq!(transport.open_instants().len(), 2);
    assert_eq!(status.seen().last(), Some(&ConnectionState::Disconnected));

    // A nudge connects again immediately, with no backoff wait.
    let nudged_at = Instant::now();
    feed.notify_visible();
    settle().await;

    let opens = transport.open_instants();
    assert_eq!(opens.len(), 3);
    assert_eq!(opens[2], nudged_at);
    assert_eq!(status.seen().last(), Some(&ConnectionState::Connected));

    feed.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_refills_on_successful_connect() {
    // Fail, connect briefly, fail twice more. With a budget of one
    // retry per connected period, the second cycle only proceeds if
    // the successful connect reset the counter.
    let transport = ScriptedTransport::new(vec![
        Attempt::Refused,
        Attempt::Session(vec![]),
        Attempt::Refused,
    ]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        view,
        Arc::clone(&status),
        &feed_config(1, 100),
    );
    feed.connect();
    settle().await;

    let opens = transport.open_instants();
    assert_eq!(opens.len(), 3);
    // Both waits are the base delay: the counter started over after
    // the successful connect in between.
    assert_eq!(opens[1] - opens[0], Duration::from_millis(100));
    assert_eq!(opens[2] - opens[1], Duration::from_millis(100));

    assert_no_repeats(&status.seen());
    feed.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_pending_reconnect() {
    let transport = ScriptedTransport::new(vec![Attempt::Refused]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        view,
        Arc::clone(&status),
        &feed_config(5, 60_000),
    );
    feed.connect();

    // Let the first attempt fail and the long backoff wait begin.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.open_instants().len(), 1);

    feed.close().await;
    // The pending reconnect timer died with the supervisor.
    settle().await;
    assert_eq!(transport.open_instants().len(), 1);

    let states = status.seen();
    assert_no_repeats(&states);
    assert_eq!(states.last(), Some(&ConnectionState::Disconnected));

    // Closing again is a no-op.
    feed.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_close_before_connect_is_quiet() {
    let transport = ScriptedTransport::new(vec![]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        view,
        Arc::clone(&status),
        &feed_config(5, 100),
    );
    feed.close().await;
    feed.close().await;

    // Never connected, so nothing to report and nothing dialled.
    assert!(status.seen().is_empty());
    assert!(transport.open_instants().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fault_reports_error_before_disconnect() {
    let transport = ScriptedTransport::new(vec![Attempt::Session(vec![
        letter_json("a"),
        StreamFrame::Fault("connection reset by peer".into()),
    ])]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        Arc::clone(&view),
        Arc::clone(&status),
        &feed_config(0, 100),
    );
    feed.connect();
    settle().await;
    feed.close().await;

    assert_eq!(*view.ids.lock().unwrap(), vec!["a"]);
    // Error and close are distinct notifications, in that order.
    assert_eq!(
        status.seen(),
        vec![
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Errored,
            ConnectionState::Disconnected,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_connect_while_connected_is_ignored() {
    let transport = ScriptedTransport::new(vec![Attempt::Hold]);
    let view = Arc::new(RecordingView::default());
    let status = Arc::new(RecordingStatus::default());

    let feed = LiveFeed::new(
        Arc::clone(&transport),
        view,
        Arc::clone(&status),
        &feed_config(5, 100),
    );
    feed.connect();
    settle().await;

    // Redundant start requests must not open a competing socket.
    feed.connect();
    feed.notify_visible();
    settle().await;

    assert_eq!(transport.open_instants().len(), 1);
    assert_eq!(
        status.seen(),
        vec![ConnectionState::Connecting, ConnectionState::Connected]
    );

    feed.close().await;
    assert_eq!(transport.open_instants().len(), 1);
}
