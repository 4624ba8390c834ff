//! # loopvisor
//!
//! **Loopvisor** provides suspendable, resumable, signalable loop primitives
//! for tokio.
//!
//! A *loop* is a long-running unit of repeated work that parks itself between
//! iterations and can be poked from outside: woken early, nudged on the next
//! scheduler tick, or preempted with a typed value or failure. The crate is
//! designed as a building block for pollers, flushers, keep-alives, and other
//! background workers that need more than `loop { sleep().await }`.
//!
//! ## Architecture
//! ```text
//!  external actors                     loop instance (one activation at a time)
//! ┌───────────────┐     start/stop    ┌──────────────────────────────────────┐
//! │  start()      │ ────────────────► │ Lifecycle                            │
//! │  stop()       │                   │   NotStarted → Running ⇄ Suspended   │
//! ├───────────────┤                   │             → Exited                 │
//! │  resume()     │    wake races     ├──────────────────────────────────────┤
//! │  resume_defer │ ────────────────► │ Resumer                              │
//! │  …_defer_once │                   │   pause(zero | finite | forever)     │
//! ├───────────────┤                   │   timer ◄─races─► resume ◄─► stop    │
//! │  signal(v)    │    preemption     ├──────────────────────────────────────┤
//! │  signal_err(e)│ ────────────────► │ SignalGate<T>                        │
//! └───────────────┘                   │   race(pause(..)) → value | output   │
//!                                     └──────────────┬───────────────────────┘
//!                                                    ▼
//!                                     Bus ──► events() / attach(Subscribe)
//!                                     Started, Suspended, Resumed,
//!                                     StopRequested, BodyFailed, Exited
//! ```
//!
//! ## Guarantees
//! - One activation, one iteration at a time: a loop body never runs
//!   concurrently with itself.
//! - `start`/`stop`/`resume*`/`signal*` never block or suspend the caller;
//!   they only arm state and complete pending one-shot futures.
//! - A `resume()` issued during a suspension ends *that* suspension; the
//!   pending timer is dropped, never fired late (no double wake).
//! - A wake with nothing suspended is recorded and claims the very next
//!   `pause` (no lost wake-ups).
//! - N × `resume_defer_once()` before the next wake → exactly one wake, N
//!   [`Paused`] futures completing together.
//! - A body error or panic is cleaned up after and surfaced on the event bus
//!   (`BodyFailed` then `Exited`), never swallowed and never retried.
//!
//! ## Features
//! | Area             | Description                                            | Key types                        |
//! |------------------|--------------------------------------------------------|----------------------------------|
//! | **Lifecycle**    | Start/stop, activation state machine, teardown.        | [`Lifecycle`], [`LoopConfig`]    |
//! | **Suspension**   | Pause with timer or forever; three resume flavors.     | [`Resumer`], [`Paused`]          |
//! | **Signals**      | Preempt the current wait with a typed value/failure.   | [`SignalGate`], [`Signaled`]     |
//! | **Ready loops**  | Callback adapters over the cores.                      | [`GenericLoop`], [`PeriodicLoop`], [`LoopAction`] |
//! | **Events**       | Per-loop broadcast bus with subscribers.               | [`Event`], [`EventKind`], [`Subscribe`] |
//! | **Errors**       | Typed errors with stable labels.                       | [`LoopError`]                    |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use loopvisor::{GenericLoop, LoopAction};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let poller = GenericLoop::arc("poller", |_stop| async move {
//!         // one unit of work per iteration
//!         Ok(LoopAction::PauseFor(Duration::from_millis(500)))
//!     });
//!
//!     assert!(poller.start());
//!
//!     // Elsewhere: wake it early…
//!     let paused_again = poller.resume();
//!     paused_again.await;
//!
//!     // …or end it gracefully with a typed signal.
//!     poller.signal(true);
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod loops;
mod subscribers;

// ---- Public re-exports ----

pub use config::LoopConfig;
pub use core::{Lifecycle, Paused, Resumer, SignalGate, Signaled};
pub use error::LoopError;
pub use events::{Event, EventKind};
pub use loops::{GenericLoop, LoopAction, PeriodicLoop};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
