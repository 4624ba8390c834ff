//! Ready-made loop adapters: GenericLoop and PeriodicLoop behavior.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use loopvisor::{EventKind, GenericLoop, LoopAction, LoopError, PeriodicLoop};

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn generic_loop_stops_after_three_iterations() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = GenericLoop::arc("three", move |_stop| {
        let n = counted.fetch_add(1, Ordering::Relaxed) + 1;
        async move {
            if n >= 3 {
                Ok(LoopAction::Stop)
            } else {
                Ok(LoopAction::PauseFor(Duration::from_millis(10)))
            }
        }
    });
    assert!(lp.start());

    tokio::time::sleep(Duration::from_millis(35)).await;
    assert!(!lp.is_running());
    assert_eq!(count.load(Ordering::Relaxed), 3);
}

#[tokio::test(start_paused = true)]
async fn generic_loop_pause_forever_until_resumed() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = GenericLoop::arc("parked", move |_stop| {
        counted.fetch_add(1, Ordering::Relaxed);
        async move { Ok(LoopAction::PauseForever) }
    });
    lp.start();
    settle().await;

    // One initial iteration, then parked.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(count.load(Ordering::Relaxed), 1);

    lp.resume();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(count.load(Ordering::Relaxed), 2);

    lp.stop();
}

#[tokio::test(start_paused = true)]
async fn generic_loop_signal_true_ends_it() {
    let lp = GenericLoop::arc("signaled", |_stop| async {
        Ok(LoopAction::PauseFor(Duration::from_secs(3600)))
    });
    lp.start();
    settle().await;
    assert!(lp.is_running());

    assert!(lp.signal(true));
    settle().await;
    assert!(!lp.is_running());
}

#[tokio::test(start_paused = true)]
async fn generic_loop_signal_err_surfaces_as_body_failure() {
    let lp = GenericLoop::arc("doomed", |_stop| async {
        Ok(LoopAction::PauseForever)
    });
    let mut rx = lp.events();
    lp.start();
    settle().await;

    assert!(lp.signal_err(LoopError::signal("torn down")));
    settle().await;
    assert!(!lp.is_running());

    let mut saw_failure = false;
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::BodyFailed {
            saw_failure = true;
            let reason = ev.reason.as_deref().unwrap_or_default().to_string();
            assert!(reason.contains("torn down"), "unexpected reason: {reason}");
        }
    }
    assert!(saw_failure);
}

#[tokio::test(start_paused = true)]
async fn generic_loop_body_error_ends_the_activation() {
    let lp = GenericLoop::arc("failing", |_stop| async {
        Err::<LoopAction, _>(LoopError::fail("boom"))
    });
    lp.start();
    settle().await;
    assert!(!lp.is_running());

    // Reusable after the failure.
    assert!(lp.start());
}

#[tokio::test(start_paused = true)]
async fn generic_loop_continue_reruns_without_timers() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = GenericLoop::arc("hot", move |_stop| {
        let n = counted.fetch_add(1, Ordering::Relaxed) + 1;
        async move {
            if n >= 100 {
                Ok(LoopAction::Stop)
            } else {
                Ok(LoopAction::Continue)
            }
        }
    });
    let t0 = tokio::time::Instant::now();
    lp.start();
    settle().await;

    assert_eq!(count.load(Ordering::Relaxed), 100);
    // The hundred reruns consumed no virtual time beyond the settle.
    assert_eq!(t0.elapsed(), Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn periodic_loop_ticks_on_its_interval() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = PeriodicLoop::arc("ticker", Some(Duration::from_millis(10)), move |_stop| {
        counted.fetch_add(1, Ordering::Relaxed);
        async move { Ok(false) }
    });
    lp.start();

    // First tick lands after the first interval.
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(count.load(Ordering::Relaxed), 0);

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(count.load(Ordering::Relaxed), 3);

    lp.stop();
    settle().await;
    assert!(!lp.is_running());
}

#[tokio::test(start_paused = true)]
async fn periodic_loop_stops_from_the_inside() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = PeriodicLoop::arc("finite", Some(Duration::from_millis(10)), move |_stop| {
        let n = counted.fetch_add(1, Ordering::Relaxed) + 1;
        async move { Ok(n >= 2) }
    });
    lp.start();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!lp.is_running());
    assert_eq!(count.load(Ordering::Relaxed), 2);
}

#[tokio::test(start_paused = true)]
async fn periodic_loop_signal_false_forces_an_early_tick() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = PeriodicLoop::arc("nudged", Some(Duration::from_secs(3600)), move |_stop| {
        counted.fetch_add(1, Ordering::Relaxed);
        async move { Ok(false) }
    });
    lp.start();
    settle().await;
    assert_eq!(count.load(Ordering::Relaxed), 0);

    assert!(lp.signal(false));
    settle().await;
    assert_eq!(count.load(Ordering::Relaxed), 1);

    lp.stop();
}

#[tokio::test(start_paused = true)]
async fn periodic_loop_resume_forces_an_early_tick() {
    let count = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&count);

    let lp = PeriodicLoop::arc("woken", None, move |_stop| {
        counted.fetch_add(1, Ordering::Relaxed);
        async move { Ok(false) }
    });
    lp.start();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(count.load(Ordering::Relaxed), 0);

    lp.resume();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(count.load(Ordering::Relaxed), 1);

    lp.stop();
}

#[tokio::test(start_paused = true)]
async fn loops_render_their_names() {
    let g = GenericLoop::arc("pony", |_stop| async { Ok(LoopAction::Stop) });
    let p = PeriodicLoop::arc("tock", None, |_stop| async { Ok(true) });
    assert_eq!(g.to_string(), "pony");
    assert_eq!(g.name(), "pony");
    assert_eq!(p.to_string(), "tock");
    assert_eq!(p.name(), "tock");
}
