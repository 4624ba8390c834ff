//! # Loop lifecycle events.
//!
//! Every loop publishes its lifecycle to a per-instance [`Bus`]:
//! [`EventKind::Started`] and [`EventKind::Exited`] bracket each activation
//! (exactly once each), [`EventKind::Suspended`]/[`EventKind::Resumed`] trace
//! the suspension points in between, and [`EventKind::BodyFailed`] surfaces
//! body errors to observers — the loop runs detached, so the bus is its
//! top-level error channel.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
