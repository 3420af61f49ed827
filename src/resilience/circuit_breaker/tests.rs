use std::sync::Arc;
use std::time::Duration;

use tokio::time::{advance, sleep};

use super::*;

fn breaker(fail_max: u32, reset_timeout: Duration) -> CircuitBreaker {
    CircuitBreaker::new(
        "test_service",
        BreakerConfig {
            fail_max,
            reset_timeout,
        },
    )
}

#[tokio::test]
async fn trips_exactly_at_the_failure_threshold() {
    let cb = breaker(3, Duration::from_secs(5));

    cb.record_failure();
    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Closed);
    assert_eq!(cb.failure_count(), 2);

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
    assert_eq!(cb.failure_count(), 3);

    // Further failures while Open are no-ops.
    cb.record_failure();
    assert_eq!(cb.failure_count(), 3);
}

#[tokio::test]
async fn success_resets_the_failure_count_while_closed() {
    let cb = breaker(3, Duration::from_secs(5));

    cb.record_failure();
    cb.record_failure();
    cb.record_success();
    assert_eq!(cb.failure_count(), 0);
    assert_eq!(cb.state(), CircuitState::Closed);

    // The count is consecutive failures, not a lifetime total.
    cb.record_failure();
    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Closed);
}

#[tokio::test(start_paused = true)]
async fn open_circuit_denies_until_the_reset_timeout() {
    let cb = breaker(1, Duration::from_secs(5));

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
    assert!(cb.admit().is_err());

    advance(Duration::from_secs(4)).await;
    assert!(cb.admit().is_err());

    advance(Duration::from_secs(1)).await;
    assert!(cb.admit().is_ok());
    assert_eq!(cb.state(), CircuitState::HalfOpen);

    // Only the transitioning call is admitted as the trial.
    assert!(cb.admit().is_err());
    assert!(cb.admit().is_err());
}

#[tokio::test(start_paused = true)]
async fn half_open_success_closes_the_circuit() {
    let cb = breaker(1, Duration::from_secs(5));

    cb.record_failure();
    advance(Duration::from_secs(5)).await;
    assert!(cb.admit().is_ok());

    cb.record_success();
    assert_eq!(cb.state(), CircuitState::Closed);
    assert_eq!(cb.failure_count(), 0);
    assert!(cb.admit().is_ok());
}

#[tokio::test(start_paused = true)]
async fn half_open_failure_restarts_the_timeout_window() {
    let cb = breaker(1, Duration::from_secs(5));

    cb.record_failure();
    advance(Duration::from_secs(5)).await;
    assert!(cb.admit().is_ok());

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);

    // The window restarted at the trial failure, not the original trip.
    advance(Duration::from_secs(4)).await;
    assert!(cb.admit().is_err());
    advance(Duration::from_secs(1)).await;
    assert!(cb.admit().is_ok());
}

#[tokio::test(start_paused = true)]
async fn fail_fail_fail_then_recover_scenario() {
    let cb = breaker(3, Duration::from_secs(5));

    cb.record_failure();
    cb.record_failure();
    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
    assert!(cb.admit().is_err());

    advance(Duration::from_secs(6)).await;
    assert!(cb.admit().is_ok());
    cb.record_success();

    assert_eq!(cb.state(), CircuitState::Closed);
    assert_eq!(cb.failure_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_failures_trip_once_without_overshoot() {
    let cb = Arc::new(breaker(3, Duration::from_secs(30)));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cb = cb.clone();
        handles.push(tokio::spawn(async move { cb.record_failure() }));
    }
    for handle in handles {
        handle.await.expect("recording task panicked");
    }

    // Read-modify-write is serialized: the count lands exactly on the
    // threshold and the circuit is open.
    assert_eq!(cb.state(), CircuitState::Open);
    assert_eq!(cb.failure_count(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admits_grant_a_single_trial() {
    let cb = Arc::new(breaker(1, Duration::from_millis(20)));
    cb.record_failure();
    sleep(Duration::from_millis(40)).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cb = cb.clone();
        handles.push(tokio::spawn(async move { cb.admit().is_ok() }));
    }
    let mut admitted = 0;
    for handle in handles {
        if handle.await.expect("admit task panicked") {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(cb.state(), CircuitState::HalfOpen);
}

#[tokio::test]
async fn registry_returns_the_same_instance_per_identity() {
    let registry = BreakerRegistry::new(BreakerConfig {
        fail_max: 2,
        reset_timeout: Duration::from_secs(5),
    });

    let a = registry.get("market_data");
    let b = registry.get("market_data");
    assert!(Arc::ptr_eq(&a, &b));

    a.record_failure();
    assert_eq!(b.failure_count(), 1);

    let names = registry.names();
    assert_eq!(names, vec!["market_data".to_string()]);
}
