//! # Subscriber trait and worker.
//!
//! [`Subscribe`] is the extension point for plugging event handlers into a
//! loop: logging, metrics, liveness tracking. Each subscriber attached via
//! [`Lifecycle::attach`](crate::Lifecycle::attach) is driven by its own
//! detached worker task reading the loop's event bus.
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching); they do not block the loop,
//!   only their own worker. A worker that lags behind the bus capacity skips
//!   the missed events (`Lagged`).
//! - Panics inside a subscriber are caught; the worker keeps running.
//! - The worker exits when the loop instance is dropped (bus closed).

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::events::Event;

/// Contract for loop event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should
/// avoid blocking the async runtime (prefer async I/O and cooperative waits).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use loopvisor::{Event, EventKind, Subscribe};
///
/// struct ExitCounter(std::sync::atomic::AtomicU64);
///
/// #[async_trait]
/// impl Subscribe for ExitCounter {
///     async fn on_event(&self, event: &Event) {
///         if event.kind == EventKind::Exited {
///             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Spawns the worker task driving one subscriber from a bus receiver.
pub(crate) fn spawn_subscriber_worker(
    mut rx: broadcast::Receiver<Event>,
    sub: Arc<dyn Subscribe>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let fut = sub.on_event(&ev);
                    // Contain subscriber panics; one bad handler must not
                    // kill its worker.
                    let _ = std::panic::AssertUnwindSafe(fut).catch_unwind().await;
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
