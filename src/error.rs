//! Error types used by loop bodies and the loop cores.
//!
//! A single enum, [`LoopError`], covers the three failure classes of the crate:
//!
//! - usage errors (reentrant signal waits) — fail fast, never retried;
//! - failures injected from outside via [`SignalGate::signal_err`](crate::SignalGate::signal_err);
//! - failures and panics escaping a loop body.
//!
//! The helper [`LoopError::as_label`] returns a short stable label for
//! logs/metrics.

use thiserror::Error;

/// # Errors produced by loops and their waiters.
///
/// A body failure terminates the activation; the error is published on the
/// loop's event bus as a `BodyFailed` event and is never retried by the core.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// A `wait`/`race` call was issued while another one was outstanding
    /// on the same gate. Programmer error; the new call is rejected.
    #[error("a signal wait is already pending on this gate")]
    SignalBusy,

    /// A failure delivered through the signal gate; raised at the waiter.
    #[error("signal failure: {reason}")]
    Signal {
        /// The injected failure message.
        reason: String,
    },

    /// The loop body returned an error.
    #[error("loop body failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// The loop body panicked. The panic is caught so that teardown
    /// bookkeeping still runs; the payload is preserved as text.
    #[error("loop body panicked: {reason}")]
    Panicked {
        /// The panic payload, if it was a string.
        reason: String,
    },
}

impl LoopError {
    /// Builds a [`LoopError::Fail`] from any displayable reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        LoopError::Fail {
            reason: reason.into(),
        }
    }

    /// Builds a [`LoopError::Signal`] from any displayable reason.
    pub fn signal(reason: impl Into<String>) -> Self {
        LoopError::Signal {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use loopvisor::LoopError;
    ///
    /// assert_eq!(LoopError::SignalBusy.as_label(), "signal_busy");
    /// assert_eq!(LoopError::fail("boom").as_label(), "body_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LoopError::SignalBusy => "signal_busy",
            LoopError::Signal { .. } => "signal_failure",
            LoopError::Fail { .. } => "body_failed",
            LoopError::Panicked { .. } => "body_panicked",
        }
    }

    /// True for usage errors (caller bugs), false for runtime failures.
    pub fn is_usage(&self) -> bool {
        matches!(self, LoopError::SignalBusy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(LoopError::SignalBusy.as_label(), "signal_busy");
        assert_eq!(LoopError::signal("x").as_label(), "signal_failure");
        assert_eq!(LoopError::fail("x").as_label(), "body_failed");
        assert_eq!(
            LoopError::Panicked { reason: "x".into() }.as_label(),
            "body_panicked"
        );
    }

    #[test]
    fn only_signal_busy_is_usage() {
        assert!(LoopError::SignalBusy.is_usage());
        assert!(!LoopError::fail("x").is_usage());
        assert!(!LoopError::signal("x").is_usage());
    }
}
