//! # Event subscribers.
//!
//! The [`Subscribe`] trait plus the built-in [`LogWriter`] (feature
//! `logging`). Subscribers are attached per loop via
//! [`Lifecycle::attach`](crate::Lifecycle::attach); each gets its own worker
//! task and cannot block the loop or other subscribers.

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use subscribe::spawn_subscriber_worker;
pub use subscribe::Subscribe;
