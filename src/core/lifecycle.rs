//! # Lifecycle core: the activation state machine.
//!
//! [`Lifecycle`] owns one loop instance: its name, its event bus, and the
//! shared state every capability view operates on. It drives exactly one
//! activation at a time:
//!
//! ```text
//!              start()                    body finishes / fails / panics
//! NotStarted ─────────► Running ◄─────► Suspended ──────► Exited
//!     ▲                    │   pause()/wake                  │
//!     └───── (new activation via a fresh start()) ◄──────────┘
//! ```
//!
//! ## Rules
//! - `start()` returns `true` exactly once per activation; the body is
//!   **spawned**, never run synchronously, so the caller's frame returns first.
//! - `Started` and `Exited` events bracket every activation, exactly once each.
//! - A body error or panic is never swallowed: the bookkeeping is cleaned up
//!   first, then the failure is published as `BodyFailed` — the loop runs
//!   detached, so the bus is its top-level error channel.
//! - `stop()` arms termination and wakes a live suspension; it never blocks.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::{broadcast, oneshot};
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::config::LoopConfig;
use crate::core::resumable::{Resumer, Wake};
use crate::error::LoopError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{spawn_subscriber_worker, Subscribe};

/// Activation phase of a loop instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Never started.
    NotStarted,
    /// The body is executing between suspension points.
    Running,
    /// The body is parked inside `pause`.
    Suspended,
    /// The activation ended; a fresh `start()` begins a new one.
    Exited,
}

/// Mutable per-instance state.
///
/// Guarded by a `std::sync::Mutex`: every critical section is await-free, so
/// the public methods never block or suspend their callers.
pub(crate) struct State {
    pub(crate) phase: Phase,
    /// Per-activation stop token; rotated by each `start()`.
    pub(crate) stop: CancellationToken,
    /// The live suspension's waker, consumed exactly once per suspension.
    pub(crate) resume_tx: Option<oneshot::Sender<Wake>>,
    /// A wake that arrived while nothing was suspended; consumed by the next
    /// `pause` so external resumes are never lost.
    pub(crate) pending_wake: bool,
    /// Coalesced deferred wake in flight (`resume_defer_once`).
    pub(crate) deferred: Option<AbortHandle>,
    /// Ticket of the most recently armed deferred wake.
    pub(crate) deferred_seq: u64,
    /// Callers of `resume*()` awaiting the next suspension; drained each time
    /// the loop suspends, dropped when the activation exits.
    pub(crate) pause_waiters: Vec<oneshot::Sender<()>>,
}

/// State + identity shared by all views of one loop instance.
pub(crate) struct Shared {
    pub(crate) name: Arc<str>,
    pub(crate) bus: Bus,
    state: Mutex<State>,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds an event pre-tagged with this loop's name.
    pub(crate) fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_name(Arc::clone(&self.name))
    }

    /// Terminal cleanup; runs exactly once per activation.
    fn finish(&self, res: Result<(), LoopError>) {
        let waiters = {
            let mut s = self.lock();
            s.phase = Phase::Exited;
            s.stop.cancel();
            if let Some(h) = s.deferred.take() {
                h.abort();
            }
            s.resume_tx = None;
            s.pending_wake = false;
            std::mem::take(&mut s.pause_waiters)
        };
        // Dropping the waiters completes their `Paused` futures.
        drop(waiters);

        if let Err(err) = res {
            self.bus
                .publish(self.event(EventKind::BodyFailed).with_reason(err.to_string()));
        }
        self.bus.publish(self.event(EventKind::Exited));
    }
}

/// Handle to one loop instance: lifecycle control plus event access.
///
/// Cheaply cloneable; all clones share the same instance. Suspension and
/// signal capabilities are separate views ([`Resumer`], [`SignalGate`]) so a
/// concrete loop type exposes only what it needs.
///
/// [`SignalGate`]: crate::SignalGate
///
/// # Example
/// ```no_run
/// use loopvisor::Lifecycle;
///
/// # async fn demo() {
/// let life = Lifecycle::new("worker");
/// let resumer = life.resumer();
/// let started = life.start(move |_stop| async move {
///     while resumer.pause(Some(std::time::Duration::from_millis(250))).await {
///         // one unit of work per wake
///     }
///     Ok(())
/// });
/// assert!(started);
/// # }
/// ```
#[derive(Clone)]
pub struct Lifecycle {
    shared: Arc<Shared>,
}

impl Lifecycle {
    /// Creates a loop instance with the default [`LoopConfig`].
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_config(name, LoopConfig::default())
    }

    /// Creates a loop instance with an explicit configuration.
    pub fn with_config(name: impl Into<Arc<str>>, cfg: LoopConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                bus: Bus::new(cfg.bus_capacity_clamped()),
                state: Mutex::new(State {
                    phase: Phase::NotStarted,
                    stop: CancellationToken::new(),
                    resume_tx: None,
                    pending_wake: false,
                    deferred: None,
                    deferred_seq: 0,
                    pause_waiters: Vec::new(),
                }),
            }),
        }
    }

    /// Starts a new activation.
    ///
    /// `f` receives the activation's stop token and returns the body future,
    /// which is spawned on the runtime — never run synchronously, so the
    /// caller's call frame returns before the first iteration.
    ///
    /// Returns `false` (and does nothing) if an activation is already running.
    /// After the activation exits, a fresh `start()` begins a new one.
    pub fn start<F, Fut>(&self, f: F) -> bool
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), LoopError>> + Send + 'static,
    {
        let token = {
            let mut s = self.shared.lock();
            if matches!(s.phase, Phase::Running | Phase::Suspended) {
                return false;
            }
            s.phase = Phase::Running;
            s.stop = CancellationToken::new();
            s.stop.clone()
        };
        self.shared.bus.publish(self.shared.event(EventKind::Started));

        let body = f(token);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            // Panics are caught so teardown always runs; the payload is
            // surfaced as a BodyFailed event like any other body error.
            let outcome = match std::panic::AssertUnwindSafe(body).catch_unwind().await {
                Ok(res) => res,
                Err(payload) => Err(LoopError::Panicked {
                    reason: panic_reason(payload.as_ref()),
                }),
            };
            shared.finish(outcome);
        });
        true
    }

    /// Requests termination of the current activation.
    ///
    /// A suspended loop is woken immediately (pending timer dropped, deferred
    /// wake aborted); an actively-executing body observes the request at its
    /// next suspension point. Returns `false` if nothing is running.
    pub fn stop(&self) -> bool {
        {
            let mut s = self.shared.lock();
            if !matches!(s.phase, Phase::Running | Phase::Suspended) {
                return false;
            }
            s.stop.cancel();
            if let Some(h) = s.deferred.take() {
                h.abort();
            }
            if let Some(tx) = s.resume_tx.take() {
                let _ = tx.send(Wake::Stop);
            }
        }
        self.shared
            .bus
            .publish(self.shared.event(EventKind::StopRequested));
        true
    }

    /// True while an activation is alive (executing or suspended).
    pub fn is_running(&self) -> bool {
        matches!(self.shared.lock().phase, Phase::Running | Phase::Suspended)
    }

    /// The loop's display name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Returns a receiver observing this loop's subsequent lifecycle events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Attaches a subscriber: one detached worker per call forwards this
    /// loop's events to `sub`, isolating its panics. The worker exits when the
    /// loop instance (all its handles) is dropped.
    pub fn attach(&self, sub: Arc<dyn Subscribe>) -> JoinHandle<()> {
        spawn_subscriber_worker(self.shared.bus.subscribe(), sub)
    }

    /// Returns the suspension capability view of this instance.
    pub fn resumer(&self) -> Resumer {
        Resumer::new(Arc::clone(&self.shared))
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shared.name)
    }
}

/// Extracts a printable message from a caught panic payload.
fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
