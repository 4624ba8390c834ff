//! # Generic loop: a single async callback driven by its own verdicts.
//!
//! [`GenericLoop`] runs a user callback once per iteration and interprets the
//! returned [`LoopAction`]: rerun immediately, pause for a while, pause until
//! resumed, or stop.
//!
//! Between iterations the loop waits inside
//! `gate.race(resumer.pause(timeout))`, so it can be ended early from outside
//! by `signal(true)` (graceful, typed) or [`GenericLoop::stop`] — and nudged
//! with the `resume*` family.
//!
//! ## Flow
//! ```text
//! start() ──► spawn drive():
//!   loop {
//!     ├─► action = body(stop_token).await?
//!     ├─► Stop ─────────────► return
//!     └─► race(pause(action)):
//!           ├─ signal(true) ─► return
//!           ├─ signal(false) ► next iteration now
//!           ├─ signal_err(e) ► return Err(e)   (BodyFailed on the bus)
//!           └─ pause ends ───► next iteration (or return if stopping)
//!   }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::LoopConfig;
use crate::core::{Lifecycle, Paused, Resumer, SignalGate, Signaled};
use crate::error::LoopError;
use crate::events::Event;
use crate::loops::action::LoopAction;
use crate::subscribers::Subscribe;

/// Callback-driven loop with the full capability set: lifecycle, suspension,
/// and a `bool`-typed signal gate (`signal(true)` stops the loop).
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use loopvisor::{GenericLoop, LoopAction};
///
/// # async fn demo() {
/// let poller = GenericLoop::arc("poller", |_stop| async move {
///     // ... one unit of work ...
///     Ok(LoopAction::PauseFor(Duration::from_secs(1)))
/// });
/// poller.start();
/// // later, from anywhere:
/// poller.signal(true); // graceful stop
/// # }
/// ```
pub struct GenericLoop<F> {
    life: Lifecycle,
    resumer: Resumer,
    gate: SignalGate<bool>,
    body: F,
}

impl<F, Fut> GenericLoop<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<LoopAction, LoopError>> + Send + 'static,
{
    /// Creates the loop with the default [`LoopConfig`].
    pub fn arc(name: impl Into<Arc<str>>, body: F) -> Arc<Self> {
        Self::arc_with_config(name, LoopConfig::default(), body)
    }

    /// Creates the loop with an explicit configuration.
    pub fn arc_with_config(
        name: impl Into<Arc<str>>,
        cfg: LoopConfig,
        body: F,
    ) -> Arc<Self> {
        let life = Lifecycle::with_config(name, cfg);
        let resumer = life.resumer();
        Arc::new(Self {
            life,
            resumer,
            gate: SignalGate::new(),
            body,
        })
    }

    /// Starts a new activation; `false` if already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let this = Arc::clone(self);
        self.life.start(move |stop| async move { this.drive(stop).await })
    }

    async fn drive(&self, stop: CancellationToken) -> Result<(), LoopError> {
        loop {
            let action = (self.body)(stop.clone()).await?;
            let Some(timeout) = action.timeout() else {
                return Ok(());
            };
            match self.gate.race(self.resumer.pause(timeout)).await? {
                Signaled::Signal(true) => return Ok(()),
                Signaled::Signal(false) => {}
                Signaled::Completed(keep) => {
                    if !keep {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Requests termination; see [`Lifecycle::stop`].
    pub fn stop(&self) -> bool {
        self.life.stop()
    }

    /// True while an activation is alive.
    pub fn is_running(&self) -> bool {
        self.life.is_running()
    }

    /// Wakes the current pause now; see [`Resumer::resume`].
    pub fn resume(&self) -> Paused {
        self.resumer.resume()
    }

    /// Wakes the current pause one scheduler tick later.
    pub fn resume_defer(&self) -> Paused {
        self.resumer.resume_defer()
    }

    /// Deferred, coalesced wake; see [`Resumer::resume_defer_once`].
    pub fn resume_defer_once(&self) -> Paused {
        self.resumer.resume_defer_once()
    }

    /// Preempts the loop's current wait with a value; `true` ends the loop
    /// gracefully. Dropped (returns `false`) if the loop is not waiting.
    pub fn signal(&self, value: bool) -> bool {
        self.gate.signal(value)
    }

    /// Preempts the loop's current wait with a failure; the activation ends
    /// with a `BodyFailed` event carrying it.
    pub fn signal_err(&self, err: LoopError) -> bool {
        self.gate.signal_err(err)
    }

    /// Receiver for this loop's lifecycle events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.life.events()
    }

    /// Attaches a subscriber to this loop's events.
    pub fn attach(&self, sub: Arc<dyn Subscribe>) -> JoinHandle<()> {
        self.life.attach(sub)
    }

    /// The loop's display name.
    pub fn name(&self) -> &str {
        self.life.name()
    }
}

impl<F> fmt::Display for GenericLoop<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.life, f)
    }
}
