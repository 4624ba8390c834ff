//! # Per-iteration verdict of a generic loop body.

use std::time::Duration;

/// What a [`GenericLoop`](crate::GenericLoop) body wants next.
///
/// A tagged verdict instead of an overloaded numeric sentinel: "pause zero"
/// and "stop" are distinct variants, not magic values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Rerun the body immediately (still observes a pending stop, no timer).
    Continue,
    /// Pause for the given duration, then rerun.
    PauseFor(Duration),
    /// Pause until resumed (or signaled/stopped) from outside.
    PauseForever,
    /// End the activation.
    Stop,
}

impl LoopAction {
    /// The pause timeout this action maps to; `None` for [`LoopAction::Stop`].
    pub(crate) fn timeout(self) -> Option<Option<Duration>> {
        match self {
            LoopAction::Stop => None,
            LoopAction::Continue => Some(Some(Duration::ZERO)),
            LoopAction::PauseFor(d) => Some(Some(d)),
            LoopAction::PauseForever => Some(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_timeouts() {
        assert_eq!(LoopAction::Stop.timeout(), None);
        assert_eq!(LoopAction::Continue.timeout(), Some(Some(Duration::ZERO)));
        assert_eq!(
            LoopAction::PauseFor(Duration::from_millis(5)).timeout(),
            Some(Some(Duration::from_millis(5)))
        );
        assert_eq!(LoopAction::PauseForever.timeout(), Some(None));
    }
}
