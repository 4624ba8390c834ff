//! # Ready-made callback loops.
//!
//! Thin call sites of the cores:
//! - [`GenericLoop`] — body returns a [`LoopAction`] verdict per iteration;
//! - [`PeriodicLoop`] — callback on a fixed interval.
//!
//! Both compose a [`Lifecycle`](crate::Lifecycle), a
//! [`Resumer`](crate::Resumer), and a `bool`-typed
//! [`SignalGate`](crate::SignalGate), and expose the combined surface by
//! delegation. Custom loop shapes build on the same three pieces.

mod action;
mod generic;
mod periodic;

pub use action::LoopAction;
pub use generic::GenericLoop;
pub use periodic::PeriodicLoop;
