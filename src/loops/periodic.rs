//! # Periodic loop: a callback on a fixed interval.
//!
//! [`PeriodicLoop`] waits `interval` (or forever, when `None`) and then runs
//! the callback — first tick after the first interval. It can be ended from
//! the inside by returning `Ok(true)`, or from the outside by `signal(true)`
//! or [`PeriodicLoop::stop`]. A `resume*()` or `signal(false)` forces an
//! early tick.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::LoopConfig;
use crate::core::{Lifecycle, Paused, Resumer, SignalGate, Signaled};
use crate::error::LoopError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Fixed-interval loop with the full capability set.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use loopvisor::PeriodicLoop;
///
/// # async fn demo() {
/// let ticker = PeriodicLoop::arc(
///     "ticker",
///     Some(Duration::from_secs(5)),
///     |_stop| async move {
///         // ... one tick of work; Ok(true) would end the loop ...
///         Ok(false)
///     },
/// );
/// ticker.start();
/// # }
/// ```
pub struct PeriodicLoop<F> {
    life: Lifecycle,
    resumer: Resumer,
    gate: SignalGate<bool>,
    interval: Option<Duration>,
    callback: F,
}

impl<F, Fut> PeriodicLoop<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, LoopError>> + Send + 'static,
{
    /// Creates the loop with the default [`LoopConfig`].
    ///
    /// `interval = None` pauses indefinitely between ticks: the loop then
    /// ticks only when resumed or signaled.
    pub fn arc(name: impl Into<Arc<str>>, interval: Option<Duration>, callback: F) -> Arc<Self> {
        Self::arc_with_config(name, LoopConfig::default(), interval, callback)
    }

    /// Creates the loop with an explicit configuration.
    pub fn arc_with_config(
        name: impl Into<Arc<str>>,
        cfg: LoopConfig,
        interval: Option<Duration>,
        callback: F,
    ) -> Arc<Self> {
        let life = Lifecycle::with_config(name, cfg);
        let resumer = life.resumer();
        Arc::new(Self {
            life,
            resumer,
            gate: SignalGate::new(),
            interval,
            callback,
        })
    }

    /// Starts a new activation; `false` if already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let this = Arc::clone(self);
        self.life.start(move |stop| async move { this.drive(stop).await })
    }

    async fn drive(&self, stop: CancellationToken) -> Result<(), LoopError> {
        loop {
            match self.gate.race(self.resumer.pause(self.interval)).await? {
                Signaled::Signal(true) => return Ok(()),
                Signaled::Signal(false) => {}
                Signaled::Completed(keep) => {
                    if !keep {
                        return Ok(());
                    }
                }
            }
            if (self.callback)(stop.clone()).await? {
                return Ok(());
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

    /// Forces an early tick; see [`Resumer::resume`].
    pub fn resume(&self) -> Paused {
        self.resumer.resume()
    }

    /// Early tick, one scheduler tick later.
    pub fn resume_defer(&self) -> Paused {
        self.resumer.resume_defer()
    }

    /// Deferred, coalesced early tick; see [`Resumer::resume_defer_once`].
    pub fn resume_defer_once(&self) -> Paused {
        self.resumer.resume_defer_once()
    }

    /// Preempts the current wait; `true` ends the loop gracefully, `false`
    /// forces an early tick. Dropped if the loop is not waiting.
    pub fn signal(&self, value: bool) -> bool {
        self.gate.signal(value)
    }

    /// Preempts the current wait with a failure; the activation ends with a
    /// `BodyFailed` event carrying it.
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

impl<F> fmt::Display for PeriodicLoop<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.life, f)
    }
}
