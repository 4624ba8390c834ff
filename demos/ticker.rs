//! # Demo: ticker
//!
//! A periodic loop ticking every 500ms, stopped gracefully from the outside.
//!
//! Demonstrates how to:
//! - Build a [`PeriodicLoop`] with a fixed interval.
//! - Observe its lifecycle through the event bus.
//! - End it with a typed signal instead of tearing anything down.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► ticker.start()
//!   │     ├─► publish(Started)
//!   │     └─► pause(500ms) → tick → pause(500ms) → …
//!   ├─► sleep 2.2s (≈4 ticks)
//!   ├─► ticker.signal(true)   → graceful stop
//!   │     └─► publish(Exited)
//!   └─► exit
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example ticker
//! ```

use std::time::Duration;

use loopvisor::{EventKind, PeriodicLoop};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let ticker = PeriodicLoop::arc("ticker", Some(Duration::from_millis(500)), |_stop| async {
        println!("[ticker] tick");
        Ok(false)
    });

    // Watch the lifecycle from outside.
    let mut events = ticker.events();
    tokio::spawn(async move {
        while let Ok(ev) = events.recv().await {
            if matches!(ev.kind, EventKind::Started | EventKind::Exited) {
                println!("[events] {:?}", ev.kind);
            }
        }
    });

    assert!(ticker.start());
    tokio::time::sleep(Duration::from_millis(2200)).await;

    // `true` means "stop" for the ready-made loops.
    ticker.signal(true);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!ticker.is_running());
    println!("[main] done");
}
