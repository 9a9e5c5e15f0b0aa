//! Concurrency tests for the rate gate.

use futures::future::join_all;
use nurseai_core::GateConfigBuilder;
use nurseai_rate_limit::RateGate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_concurrent_dispatches_are_spaced() {
    let interval = Duration::from_millis(750);
    let gate = RateGate::new(interval);
    let dispatches = Arc::new(Mutex::new(Vec::new()));

    let tasks = (0..8).map(|_| {
        let gate = gate.clone();
        let dispatches = dispatches.clone();
        tokio::spawn(async move {
            gate.acquire().await;
            dispatches.lock().await.push(Instant::now());
        })
    });
    for result in join_all(tasks).await {
        result.expect("acquire task panicked");
    }

    let mut times = dispatches.lock().await.clone();
    times.sort();
    assert_eq!(times.len(), 8);
    for pair in times.windows(2) {
        assert!(
            pair[1] - pair[0] >= interval,
            "dispatches {:?} apart",
            pair[1] - pair[0]
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_arrival_order_is_preserved() {
    let gate = RateGate::new(Duration::from_secs(1));
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for id in 0..5 {
        let gate = gate.clone();
        let order = order.clone();
        handles.push(tokio::spawn(async move {
            gate.acquire().await;
            order.lock().await.push(id);
        }));
        // Let the task reach the gate before spawning the next one
        tokio::task::yield_now().await;
    }
    for handle in handles {
        handle.await.expect("acquire task panicked");
    }

    assert_eq!(*order.lock().await, vec![0, 1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_gate_from_config() {
    let config = GateConfigBuilder::default()
        .min_interval_ms(200u64)
        .build()
        .expect("valid gate config");
    let gate = RateGate::from_config(&config);
    assert_eq!(gate.min_interval(), Duration::from_millis(200));

    let start = Instant::now();
    for _ in 0..4 {
        gate.acquire().await;
    }
    assert!(start.elapsed() >= Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_waiter_still_consumes_slot() {
    let gate = RateGate::new(Duration::from_secs(1));
    gate.acquire().await;

    // Reserves the slot at +1s, then gives up before being released
    let _ = tokio::time::timeout(Duration::from_millis(10), gate.acquire()).await;

    let start = Instant::now();
    gate.acquire().await;
    assert!(start.elapsed() >= Duration::from_millis(1980));
}
