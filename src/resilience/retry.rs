//! Bounded retry execution for transient faults.
//!
//! # Responsibilities
//! - Run one operation up to the budget's attempt ceiling
//! - Consult the failure classifier after every failed attempt
//! - Sleep the backoff delay between attempts (calling task only)
//!
//! # Design Decisions
//! - Permanent faults abort immediately; retrying a 4xx cannot help
//! - Exhaustion wraps the last fault so the caller sees the real cause

use std::future::Future;

use thiserror::Error;
use tokio::time::sleep;

use super::backoff::RetryBudget;
use super::fault::{FailureClassifier, Fault, FaultClass};

/// Terminal failure of a retried call.
#[derive(Debug, Error)]
pub enum RetryError {
    /// The fault was classified permanent; no further attempts were made.
    #[error("permanent fault on attempt {attempts}: {source}")]
    Permanent {
        attempts: u32,
        #[source]
        source: Fault,
    },

    /// Every attempt failed with a transient fault.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Fault,
    },
}

/// Run `operation` under `budget`, retrying transient faults only.
///
/// The closure receives the 1-indexed attempt number. Success returns
/// immediately with no further attempts and no delay.
pub async fn run_with_retry<T, F, Fut>(
    budget: &RetryBudget,
    classifier: &FailureClassifier,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Fault>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(fault) => match classifier.classify(&fault) {
                FaultClass::Permanent => {
                    return Err(RetryError::Permanent {
                        attempts: attempt,
                        source: fault,
                    });
                }
                FaultClass::Transient if attempt < budget.max_attempts => {
                    let delay = budget.delay(attempt);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        fault = %fault,
                        "transient fault, backing off before retry"
                    );
                    sleep(delay).await;
                }
                FaultClass::Transient => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        source: fault,
                    });
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn quick_budget() -> RetryBudget {
        RetryBudget {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            multiplier: 2.0,
            jitter: false,
        }
    }

    #[tokio::test]
    async fn permanent_fault_makes_exactly_one_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = run_with_retry(
            &quick_budget(),
            &FailureClassifier::default(),
            |_attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Fault::Status(404)) }
            },
        )
        .await;

        assert!(matches!(result, Err(RetryError::Permanent { attempts: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_faults_exhaust_the_budget() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let result: Result<(), _> = run_with_retry(
            &RetryBudget::default(),
            &FailureClassifier::default(),
            |_attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Fault::Status(503)) }
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 3, source: Fault::Status(503) })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Attempts at t=0, t=2, t=6 with the default 2s/x2 budget.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn success_short_circuits_remaining_attempts() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let result = run_with_retry(
            &quick_budget(),
            &FailureClassifier::default(),
            |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(Fault::Timeout)
                    } else {
                        Ok(attempt)
                    }
                }
            },
        )
        .await;

        assert_eq!(result.ok(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // One backoff sleep, none after the success.
        assert_eq!(started.elapsed(), Duration::from_millis(10));
    }
}
