//! # Per-loop configuration.
//!
//! [`LoopConfig`] centralizes the knobs a loop is built with. There is only
//! one today; it exists so call sites inherit sane defaults instead of
//! sprinkling magic numbers.

/// Configuration for a loop instance.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus).
///   Slow event receivers that lag behind more than `bus_capacity` events
///   observe `Lagged` and skip older items.
#[derive(Clone, Copy, Debug)]
pub struct LoopConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl LoopConfig {
    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for LoopConfig {
    /// Default configuration: `bus_capacity = 64`.
    fn default() -> Self {
        Self { bus_capacity: 64 }
    }
}
