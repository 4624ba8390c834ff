//! # Event bus for broadcasting loop lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the loop cores.
//!
//! ```text
//! Publishers:                          Subscribers (any number):
//!   Lifecycle ──┐
//!   Resumer   ──┼──────► Bus ─────┬──► events() receiver (user code)
//!   stop()    ──┘  (broadcast)    └──► attached Subscribe workers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or suspends.
//! - **Bounded capacity**: a ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n`
//!   oldest items.
//! - **No persistence**: events published with no live receivers are dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for loop lifecycle events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender); every loop owns
/// one and hands out receivers via `events()`.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped; this function still
    /// returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver observing subsequent events.
    ///
    /// Each call creates an independent receiver; a receiver only gets events
    /// sent after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
