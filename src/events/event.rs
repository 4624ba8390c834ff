//! # Lifecycle events emitted by loop instances.
//!
//! The [`EventKind`] enum classifies what happened; the [`Event`] struct
//! carries metadata: the loop name, the pause delay, a failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically across all loops in the process. Use `seq` to restore the
//! exact order when events are observed out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use loopvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Suspended)
//!     .with_name("poller")
//!     .with_delay(Duration::from_millis(250));
//!
//! assert_eq!(ev.kind, EventKind::Suspended);
//! assert_eq!(ev.name.as_deref(), Some("poller"));
//! assert_eq!(ev.delay_ms, Some(250));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of loop lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A new activation began (`start()` succeeded).
    ///
    /// Sets:
    /// - `name`: loop name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Started,

    /// The loop body reached a suspension point and is now waiting.
    ///
    /// Sets:
    /// - `name`: loop name
    /// - `delay_ms`: pause duration in milliseconds; absent for an
    ///   indefinite pause
    /// - `at`, `seq`
    Suspended,

    /// A suspension ended and the body is running again.
    ///
    /// Sets:
    /// - `name`: loop name
    /// - `reason`: wake source (`"timer"` or `"resume"`)
    /// - `at`, `seq`
    Resumed,

    /// Termination was requested via `stop()`.
    ///
    /// Sets:
    /// - `name`: loop name
    /// - `at`, `seq`
    StopRequested,

    /// The loop body returned an error or panicked.
    ///
    /// Always followed by [`EventKind::Exited`] for the same activation.
    ///
    /// Sets:
    /// - `name`: loop name
    /// - `reason`: failure message
    /// - `at`, `seq`
    BodyFailed,

    /// The activation ended; internal bookkeeping has been cleaned up.
    ///
    /// Published exactly once per activation, after all iterations.
    ///
    /// Sets:
    /// - `name`: loop name
    /// - `at`, `seq`
    Exited,
}

/// Loop lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the loop this event belongs to.
    pub name: Option<Arc<str>>,
    /// Pause duration in milliseconds (absent = indefinite pause).
    pub delay_ms: Option<u64>,
    /// Human-readable reason (wake source, failure message).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            name: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches the loop name.
    #[inline]
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a pause delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::Started);
        let b = Event::new(EventKind::Exited);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::new(EventKind::BodyFailed)
            .with_name("w")
            .with_reason("boom")
            .with_delay(Duration::from_secs(2));
        assert_eq!(ev.name.as_deref(), Some("w"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert_eq!(ev.delay_ms, Some(2000));
    }
}
