//! Loop cores: lifecycle, suspension, and signal capabilities.
//!
//! Internal modules:
//! - [`lifecycle`]: activation state machine, start/stop, teardown, events;
//! - [`resumable`]: pause/resume machinery and the wake races;
//! - [`signal`]: typed signal injection preempting a loop's current wait.
//!
//! A concrete loop type composes the views it needs: every loop has a
//! [`Lifecycle`]; resumable loops add a [`Resumer`]; signalable loops add a
//! [`SignalGate`].

mod lifecycle;
mod resumable;
mod signal;

pub use lifecycle::Lifecycle;
pub use resumable::{Paused, Resumer};
pub use signal::{SignalGate, Signaled};
