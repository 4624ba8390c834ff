//! # Suspension core: pause, resume, and the wake races.
//!
//! [`Resumer`] is the suspension capability view of a loop instance. The loop
//! body parks itself in [`Resumer::pause`]; external actors end the suspension
//! with [`Resumer::resume`] (synchronous wake), [`Resumer::resume_defer`]
//! (wake one scheduler tick later), or [`Resumer::resume_defer_once`]
//! (deferred and coalesced).
//!
//! ## Wake races
//! ```text
//! pause(Some(d)):            ┌─ sleep(d) elapses ──► Wake::Timer
//!   arm resume_tx, race ─────┤
//!                            └─ resume*() ─────────► Wake::Resumed
//!                               stop() ────────────► Wake::Stop
//! ```
//! Whichever source fires first consumes the suspension's waker; the loser is
//! dropped. The raced sleep *is* the pending timer: an external wake drops it
//! (deterministic cancel, no double wake), and a timer win clears the waker so
//! a stray held wake cannot fire against a later suspension.
//!
//! ## Lost wakeups
//! A wake that arrives while nothing is suspended — including before
//! `start()` — is recorded and consumed by the very next `pause`, which then
//! resolves instantly. Wakes against an exited instance are discarded.
//!
//! ## Rules
//! - At most one suspension is live at a time (one waker, consumed once).
//! - `resume*()` never blocks or suspends the caller; each returns a
//!   [`Paused`] future completing the next time the loop suspends (or when
//!   the activation exits).
//! - N × `resume_defer_once()` before the next wake → exactly one wake, N
//!   futures completing together. Plain `resume_defer` does not coalesce.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time;

use crate::core::lifecycle::{Phase, Shared, State};
use crate::events::EventKind;

/// What ended a suspension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The pause timer elapsed.
    Timer,
    /// An external `resume*()` call.
    Resumed,
    /// Termination was requested.
    Stop,
}

impl Wake {
    fn label(self) -> &'static str {
        match self {
            Wake::Timer => "timer",
            Wake::Resumed => "resume",
            Wake::Stop => "stop",
        }
    }
}

/// Future returned by the `resume*()` family.
///
/// Completes the next time the loop suspends — i.e. it tracks "has the loop
/// gotten back to its next pause point". If the activation exits without
/// suspending again, it completes at teardown instead; callers that care can
/// consult `is_running()` afterwards.
pub struct Paused {
    rx: oneshot::Receiver<()>,
}

impl Future for Paused {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // Completion and sender drop both count as "the wait is over".
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}

/// Suspension capability view of a loop instance.
///
/// Obtained from [`Lifecycle::resumer`](crate::Lifecycle::resumer); cheap to
/// clone, all clones address the same instance.
#[derive(Clone)]
pub struct Resumer {
    shared: Arc<Shared>,
}

/// Disarms a live suspension if the `pause` future is dropped mid-wait
/// (e.g. it lost a [`SignalGate::race`](crate::SignalGate::race)): the waker
/// is discarded and the phase restored, so the next `pause` starts clean.
struct SuspendGuard {
    shared: Arc<Shared>,
    armed: bool,
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut s = self.shared.lock();
        s.resume_tx = None;
        if s.phase == Phase::Suspended {
            s.phase = Phase::Running;
        }
    }
}

impl Resumer {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Suspends the calling iteration.
    ///
    /// - `Some(Duration::ZERO)`: no suspension, no timer — the "rerun
    ///   immediately" fast path.
    /// - `None`: pause indefinitely; only `resume*()` or `stop()` end it.
    /// - `Some(d)`: pause for `d`, ended early by `resume*()`/`stop()`.
    ///
    /// Returns `true` if the loop should keep running, `false` if the
    /// activation should terminate (stop requested, or called outside an
    /// activation). Callable only from the loop body; a second concurrent
    /// `pause` on the same instance is rejected (`false`).
    pub async fn pause(&self, timeout: Option<Duration>) -> bool {
        if timeout == Some(Duration::ZERO) {
            let s = self.shared.lock();
            return s.phase == Phase::Running && !s.stop.is_cancelled();
        }

        let mut rx = {
            let mut s = self.shared.lock();
            if s.phase != Phase::Running || s.stop.is_cancelled() {
                return false;
            }
            // Everyone awaiting "paused again" gets released now.
            for tx in s.pause_waiters.drain(..) {
                let _ = tx.send(());
            }
            if s.pending_wake {
                s.pending_wake = false;
                return true;
            }
            let (tx, rx) = oneshot::channel();
            s.resume_tx = Some(tx);
            s.phase = Phase::Suspended;
            rx
        };

        let mut suspended = self.shared.event(EventKind::Suspended);
        if let Some(d) = timeout {
            suspended = suspended.with_delay(d);
        }
        self.shared.bus.publish(suspended);

        let mut guard = SuspendGuard {
            shared: Arc::clone(&self.shared),
            armed: true,
        };

        let wake = match timeout {
            None => rx.await.unwrap_or(Wake::Stop),
            Some(d) => {
                tokio::select! {
                    biased;
                    w = &mut rx => w.unwrap_or(Wake::Stop),
                    () = time::sleep(d) => Wake::Timer,
                }
            }
        };
        guard.armed = false;

        let keep = {
            let mut s = self.shared.lock();
            if wake == Wake::Timer {
                // The timer won: drop the external-resume bookkeeping so a
                // stray held waker cannot fire against a later suspension.
                s.resume_tx = None;
            }
            if s.phase == Phase::Suspended {
                s.phase = Phase::Running;
            }
            wake != Wake::Stop && !s.stop.is_cancelled()
        };
        if keep {
            self.shared
                .bus
                .publish(self.shared.event(EventKind::Resumed).with_reason(wake.label()));
        }
        keep
    }

    /// Wakes a live suspension right now (the pending timer is dropped), or
    /// records the wake for the next `pause` if nothing is suspended.
    ///
    /// Returns a [`Paused`] future completing the next time the loop
    /// suspends.
    pub fn resume(&self) -> Paused {
        let (tx, rx) = oneshot::channel();
        {
            let mut s = self.shared.lock();
            s.pause_waiters.push(tx);
            wake_now(&mut s);
        }
        Paused { rx }
    }

    /// Like [`resume`](Resumer::resume), but the wake is applied one scheduler
    /// tick later instead of synchronously — the current call stack is left
    /// undisturbed. Not coalesced: every call delivers its own wake.
    pub fn resume_defer(&self) -> Paused {
        let (tx, rx) = oneshot::channel();
        self.shared.lock().pause_waiters.push(tx);

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            wake_now(&mut shared.lock());
        });
        Paused { rx }
    }

    /// Like [`resume_defer`](Resumer::resume_defer), but calls made while one
    /// deferred wake is in flight are coalesced into that single wake. Every
    /// call still gets its own [`Paused`] future; they all complete together
    /// at the next suspension.
    pub fn resume_defer_once(&self) -> Paused {
        let (tx, rx) = oneshot::channel();
        let mut s = self.shared.lock();
        s.pause_waiters.push(tx);

        if s.deferred.is_none() {
            s.deferred_seq = s.deferred_seq.wrapping_add(1);
            let ticket = s.deferred_seq;
            let shared = Arc::clone(&self.shared);
            let handle = tokio::spawn(async move {
                let mut s = shared.lock();
                // Only the wake that armed the handle may clear it; a stale
                // task racing a stop/restart must not clobber a newer one.
                if s.deferred_seq == ticket {
                    s.deferred = None;
                }
                wake_now(&mut s);
            });
            s.deferred = Some(handle.abort_handle());
        }
        Paused { rx }
    }

    /// True while an activation is alive; see
    /// [`Lifecycle::is_running`](crate::Lifecycle::is_running).
    pub fn is_running(&self) -> bool {
        matches!(
            self.shared.lock().phase,
            Phase::Running | Phase::Suspended
        )
    }
}

/// Applies one external wake: completes a live suspension, or records a
/// pending wake so the next `pause` resolves instantly. Wakes against an
/// exited (or stopping) instance are discarded.
fn wake_now(s: &mut State) {
    if s.phase == Phase::Exited || s.stop.is_cancelled() {
        return;
    }
    match s.resume_tx.take() {
        Some(tx) => {
            let _ = tx.send(Wake::Resumed);
        }
        None => s.pending_wake = true,
    }
}
