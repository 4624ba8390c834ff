//! # Demo: signal_stop
//!
//! "Stop the loop with a custom reason": a worker polls on an interval, and
//! an external actor preempts the wait with a typed value — either letting
//! the timer elapse naturally or ending the loop early with a reason.
//!
//! Demonstrates how to:
//! - Compose a custom signal payload with [`SignalGate`].
//! - Race a signal against a pause (`gate.race(resumer.pause(..))`).
//!
//! ## Run
//! ```bash
//! cargo run --example signal_stop
//! ```

use std::sync::Arc;
use std::time::Duration;

use loopvisor::{Lifecycle, SignalGate, Signaled};

#[derive(Debug)]
enum Verdict {
    Reload,
    Quit(&'static str),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let life = Lifecycle::new("poller");
    let gate = Arc::new(SignalGate::<Verdict>::new());

    let worker = life.resumer();
    let inner = Arc::clone(&gate);
    life.start(move |_stop| async move {
        loop {
            match inner.race(worker.pause(Some(Duration::from_millis(300)))).await? {
                Signaled::Signal(Verdict::Reload) => println!("[poller] reloading config"),
                Signaled::Signal(Verdict::Quit(reason)) => {
                    println!("[poller] quitting: {reason}");
                    return Ok(());
                }
                Signaled::Completed(true) => println!("[poller] interval poll"),
                Signaled::Completed(false) => return Ok(()),
            }
        }
    });

    tokio::time::sleep(Duration::from_millis(700)).await; // two interval polls
    gate.signal(Verdict::Reload);
    tokio::time::sleep(Duration::from_millis(100)).await;
    gate.signal(Verdict::Quit("maintenance window"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!life.is_running());
    println!("[main] done");
}
