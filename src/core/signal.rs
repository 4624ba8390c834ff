//! # Signal core: preempting a loop's current wait with a typed value.
//!
//! [`SignalGate`] lets an external actor inject a value (or a failure) into a
//! loop body that is blocked inside [`SignalGate::race`] or
//! [`SignalGate::wait`]. The canonical composition races a signal against a
//! pause:
//!
//! ```text
//! body:     gate.race(resumer.pause(Some(interval))).await
//!                      │                │
//! external: ───────────┼── signal(v) ───┘   (delivered, pause dropped)
//!                      └── interval elapses  (pause completes, slot cleared)
//! ```
//!
//! ## Rules
//! - A signal is delivered to **exactly one** outstanding wait; with no wait
//!   outstanding it is dropped — never queued.
//! - One wait per gate at a time; a reentrant wait fails fast with
//!   [`LoopError::SignalBusy`].
//! - When both sources are ready on the same poll, the signal wins.
//! - A failure delivered via [`SignalGate::signal_err`] is raised at the
//!   waiter and propagates through the loop body like any other error.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::error::LoopError;

/// Outcome of [`SignalGate::race`]: which source won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signaled<T, U> {
    /// An external signal arrived first; carries the signaled value.
    Signal(T),
    /// The raced future completed first; carries its output.
    Completed(U),
}

impl<T, U> Signaled<T, U> {
    /// True if an external signal won the race.
    pub fn is_signal(&self) -> bool {
        matches!(self, Signaled::Signal(_))
    }

    /// Returns the signaled value, if a signal won.
    pub fn into_signal(self) -> Option<T> {
        match self {
            Signaled::Signal(v) => Some(v),
            Signaled::Completed(_) => None,
        }
    }
}

/// One-shot signal slot shared between a loop body and external actors.
///
/// Generic over the signal payload; the payload type is what external actors
/// use to tell the loop *why* it is being preempted (a stop reason, fresh
/// work, a reload request).
pub struct SignalGate<T> {
    slot: Mutex<Option<oneshot::Sender<Result<T, LoopError>>>>,
}

/// Clears the slot when a wait is dropped mid-flight, so the gate is not
/// stuck busy forever after a cancelled wait.
struct Disarm<'a, T> {
    gate: &'a SignalGate<T>,
}

impl<T> Drop for Disarm<'_, T> {
    fn drop(&mut self) {
        self.gate.lock().take();
    }
}

impl<T> SignalGate<T> {
    /// Creates a gate with no outstanding wait.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<oneshot::Sender<Result<T, LoopError>>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers `value` to the outstanding wait, if any.
    ///
    /// Returns whether it was delivered; with no wait outstanding the signal
    /// is dropped (not queued) and `false` is returned.
    pub fn signal(&self, value: T) -> bool {
        match self.lock().take() {
            Some(tx) => tx.send(Ok(value)).is_ok(),
            None => false,
        }
    }

    /// Delivers a failure to the outstanding wait, if any; the waiter raises
    /// it to its caller. Same drop semantics as [`signal`](SignalGate::signal).
    pub fn signal_err(&self, err: LoopError) -> bool {
        match self.lock().take() {
            Some(tx) => tx.send(Err(err)).is_ok(),
            None => false,
        }
    }

    /// Suspends until an external signal arrives **or** `fut` completes,
    /// whichever is first. The loser's side effects are discarded: a losing
    /// `pause` is dropped (its timer with it), a losing signal slot is
    /// cleared so a later `signal` is not misdelivered.
    ///
    /// Fails fast with [`LoopError::SignalBusy`] if another wait is already
    /// outstanding on this gate.
    pub async fn race<F>(&self, fut: F) -> Result<Signaled<T, F::Output>, LoopError>
    where
        F: Future,
    {
        let (rx, _disarm) = self.arm()?;
        tokio::pin!(fut);
        tokio::select! {
            biased;
            sig = rx => deliver(sig).map(Signaled::Signal),
            out = &mut fut => Ok(Signaled::Completed(out)),
        }
    }

    /// Suspends until an external signal arrives; nothing else ends the wait.
    pub async fn wait(&self) -> Result<T, LoopError> {
        let (rx, _disarm) = self.arm()?;
        deliver(rx.await)
    }

    fn arm(&self) -> Result<(oneshot::Receiver<Result<T, LoopError>>, Disarm<'_, T>), LoopError> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(LoopError::SignalBusy);
        }
        let (tx, rx) = oneshot::channel();
        *slot = Some(tx);
        Ok((rx, Disarm { gate: self }))
    }
}

impl<T> Default for SignalGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver<T>(sig: Result<Result<T, LoopError>, oneshot::error::RecvError>) -> Result<T, LoopError> {
    match sig {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(e),
        // The sender lives in the slot until consumed; a bare drop means the
        // slot was cleared out from under us.
        Err(_) => Err(LoopError::signal("signal slot dropped")),
    }
}
