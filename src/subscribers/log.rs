//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints loop events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [started] loop=poller
//! [suspended] loop=poller delay=250ms
//! [suspended] loop=poller delay=forever
//! [resumed] loop=poller via=timer
//! [stop-requested] loop=poller
//! [body-failed] loop=poller err="connection refused"
//! [exited] loop=poller
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event lines for
/// debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let name = e.name.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::Started => println!("[started] loop={name}"),
            EventKind::Suspended => match e.delay_ms {
                Some(ms) => println!("[suspended] loop={name} delay={ms}ms"),
                None => println!("[suspended] loop={name} delay=forever"),
            },
            EventKind::Resumed => {
                let via = e.reason.as_deref().unwrap_or("?");
                println!("[resumed] loop={name} via={via}");
            }
            EventKind::StopRequested => println!("[stop-requested] loop={name}"),
            EventKind::BodyFailed => {
                let err = e.reason.as_deref().unwrap_or("?");
                println!("[body-failed] loop={name} err={err:?}");
            }
            EventKind::Exited => println!("[exited] loop={name}"),
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
