//! Signal gate behavior: delivery, drops, failures, races against pauses.

use std::sync::Arc;
use std::time::Duration;

use loopvisor::{Lifecycle, LoopError, SignalGate, Signaled};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn signal_preempts_a_raced_sleep() {
    let gate = Arc::new(SignalGate::<&'static str>::new());
    let racer = Arc::clone(&gate);

    let t0 = Instant::now();
    let waiter = tokio::spawn(async move {
        racer.race(tokio::time::sleep(Duration::from_millis(100))).await
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(gate.signal("x"));

    let outcome = waiter.await.expect("waiter task died").expect("signal failed");
    assert_eq!(outcome, Signaled::Signal("x"));
    // Preempted at 10ms, not after the full 100ms sleep.
    assert!(t0.elapsed() < Duration::from_millis(100));
    assert!(t0.elapsed() >= Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn raced_future_completion_wins_and_clears_the_slot() {
    let gate = SignalGate::<&'static str>::new();

    let outcome = gate
        .race(tokio::time::sleep(Duration::from_millis(10)))
        .await
        .expect("race failed");
    assert_eq!(outcome, Signaled::Completed(()));
    assert!(!outcome.is_signal());

    // The losing waiter was discarded: this signal has nowhere to go.
    assert!(!gate.signal("late"));
}

#[tokio::test(start_paused = true)]
async fn signal_without_a_waiter_is_dropped_not_queued() {
    let gate = Arc::new(SignalGate::<u32>::new());
    assert!(!gate.signal(7));

    // A subsequent wait still blocks: nothing was buffered.
    let waiter = Arc::clone(&gate);
    let blocked = tokio::time::timeout(Duration::from_millis(50), async move {
        waiter.wait().await
    })
    .await;
    assert!(blocked.is_err(), "wait() observed a dropped signal");
}

#[tokio::test(start_paused = true)]
async fn signal_err_raises_at_the_waiter() {
    let gate = Arc::new(SignalGate::<u32>::new());
    let racer = Arc::clone(&gate);

    let waiter = tokio::spawn(async move {
        racer.race(tokio::time::sleep(Duration::from_secs(10))).await
    });
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(gate.signal_err(LoopError::signal("torn down")));
    let res = waiter.await.expect("waiter task died");
    assert_eq!(res, Err(LoopError::signal("torn down")));
}

#[tokio::test(start_paused = true)]
async fn reentrant_wait_fails_fast() {
    let gate = Arc::new(SignalGate::<&'static str>::new());
    let holder = Arc::clone(&gate);

    let first = tokio::spawn(async move { holder.wait().await });
    tokio::time::sleep(Duration::from_millis(1)).await;

    // The gate is busy; the reentrant call is rejected without blocking.
    assert_eq!(gate.wait().await, Err(LoopError::SignalBusy));

    // The original waiter is unaffected.
    assert!(gate.signal("done"));
    assert_eq!(first.await.expect("waiter task died"), Ok("done"));
}

#[tokio::test(start_paused = true)]
async fn dropped_wait_releases_the_gate() {
    let gate = Arc::new(SignalGate::<u32>::new());

    {
        let waiter = Arc::clone(&gate);
        let pending = tokio::spawn(async move { waiter.wait().await });
        tokio::time::sleep(Duration::from_millis(1)).await;
        pending.abort();
        let _ = pending.await;
    }
    tokio::time::sleep(Duration::from_millis(1)).await;

    // The aborted wait disarmed itself; the gate is usable again.
    let waiter = Arc::clone(&gate);
    let next = tokio::spawn(async move { waiter.wait().await });
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(gate.signal(42));
    assert_eq!(next.await.expect("waiter task died"), Ok(42));
}

#[tokio::test(start_paused = true)]
async fn signal_races_a_pause_and_wins() {
    let life = Lifecycle::new("signaled");
    let resumer = life.resumer();
    let gate = Arc::new(SignalGate::<&'static str>::new());
    let inner = Arc::clone(&gate);
    let (result_tx, result_rx) = tokio::sync::oneshot::channel();

    let t0 = Instant::now();
    life.start(move |_stop| async move {
        let outcome = inner
            .race(resumer.pause(Some(Duration::from_millis(100))))
            .await?;
        let _ = result_tx.send((outcome, t0.elapsed()));
        Ok(())
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(gate.signal("x"));

    let (outcome, elapsed) = result_rx.await.expect("body dropped the result");
    assert_eq!(outcome, Signaled::Signal("x"));
    assert!(elapsed < Duration::from_millis(100), "timer won: {elapsed:?}");

    // The preempted pause disarmed itself: the next pause works normally.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!life.is_running());
}

#[tokio::test(start_paused = true)]
async fn pause_completion_reaches_the_racing_waiter() {
    let life = Lifecycle::new("elapsed");
    let resumer = life.resumer();
    let gate = Arc::new(SignalGate::<&'static str>::new());
    let inner = Arc::clone(&gate);
    let (result_tx, result_rx) = tokio::sync::oneshot::channel();

    life.start(move |_stop| async move {
        let outcome = inner
            .race(resumer.pause(Some(Duration::from_millis(10))))
            .await?;
        let _ = result_tx.send(outcome);
        Ok(())
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        result_rx.await.expect("body dropped the result"),
        Signaled::Completed(true)
    );
    // Nobody is waiting anymore; a late signal is dropped.
    assert!(!gate.signal("late"));
}
