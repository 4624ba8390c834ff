//! # Demo: pause_resume
//!
//! A custom loop built directly on the cores: it parks itself indefinitely
//! and only works when poked.
//!
//! Demonstrates how to:
//! - Compose [`Lifecycle`] and [`Resumer`] for a custom loop shape.
//! - Wake a parked loop with `resume()` and await "paused again".
//! - Coalesce a burst of wakes with `resume_defer_once()`.
//!
//! ## Run
//! ```bash
//! cargo run --example pause_resume
//! ```

use std::time::Duration;

use loopvisor::Lifecycle;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let life = Lifecycle::new("on-demand");
    let worker = life.resumer();

    life.start(move |_stop| async move {
        let mut batch = 0u32;
        // Parked until someone resumes; false means "shut down".
        while worker.pause(None).await {
            batch += 1;
            println!("[on-demand] processing batch {batch}");
        }
        println!("[on-demand] shutting down");
        Ok(())
    });

    let resumer = life.resumer();

    // Each resume() wakes exactly one batch; the returned future completes
    // when the loop is parked again.
    for _ in 0..2 {
        resumer.resume().await;
    }

    // A burst of deferred wakes coalesces into a single batch.
    let a = resumer.resume_defer_once();
    let b = resumer.resume_defer_once();
    let c = resumer.resume_defer_once();
    a.await;
    b.await;
    c.await;

    life.stop();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!life.is_running());
    println!("[main] done");
}
