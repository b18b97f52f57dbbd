//! Connection lifecycle domain types.
//!
//! Models the state of the live letter feed and the bounded linear-backoff
//! retry budget that governs reconnection. Pure logic, no transport here:
//! the live-feed supervisor consumes these and the console surfaces the
//! state to the user.

use std::time::Duration;

/// Lifecycle state of the live feed connection.
///
/// Exactly one state is active at a time. Every change is pushed to the
/// `StatusReporter` port; the supervisor guarantees the same state is never
/// reported twice in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport open. Initial state, and re-entered after every close.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// Transport open, messages flowing.
    Connected,
    /// The transport signalled a fault. A close follows; the close makes
    /// the retry decision, not the error.
    Errored,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Errored => write!(f, "error"),
        }
    }
}

/// Bounded linear-backoff schedule for reconnect attempts.
///
/// The delay grows linearly, not exponentially: the n-th consecutive
/// failure waits `base_delay * n`, matching the backend's other
/// clients.
///
/// The counter resets only on a successful connect. External triggers
/// (`notify_visible`, a repeated `connect`) skip the wait but do not
/// refill the budget.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    /// Base delay unit; the first retry waits exactly this long.
    base_delay: Duration,
    /// Retries allowed per connected period before giving up.
    max_attempts: u32,
    /// Consecutive failed attempts so far.
    attempts: u32,
}

impl RetrySchedule {
    /// Create a schedule. `base_delay` must be non-zero (validated at the
    /// config boundary); `max_attempts` of zero means never retry.
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts,
            attempts: 0,
        }
    }

    /// Consume one retry from the budget.
    ///
    /// Returns the delay to wait before the next attempt, or `None` once
    /// the budget is spent. Each call increments the counter, so the
    /// returned delays are `base`, `2*base`, `3*base`, ...
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.base_delay * self.attempts)
    }

    /// Refill the budget after a successful connect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Consecutive failed attempts recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether the budget is spent and no automatic retry will fire.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Configured retry cap.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
