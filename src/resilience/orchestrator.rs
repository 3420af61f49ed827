//! Outbound call orchestration.
//!
//! # Data Flow
//! ```text
//! execute(operation):
//!     → breaker.admit() (denied: fast CircuitOpen, no network call)
//!     → retry executor runs the operation up to the budget
//!         → every attempt is timed, counted, and recorded on the breaker
//!     → terminal outcome mapped to CallError and counted exactly once
//! ```
//!
//! # Design Decisions
//! - Admission is checked once per call, before the retry loop
//! - Permanent faults count as breaker failures unless their status is on
//!   the classifier's exemption list; exempt faults are neutral
//! - Expected failures are returned as values; the HTTP layer owns the
//!   status-code mapping

use std::future::Future;
use std::sync::Arc;

use metrics::{counter, histogram};
use thiserror::Error;
use tokio::time::Instant;

use crate::observability::metrics::{
    ATTEMPTS_TOTAL, CALL_DURATION_SECONDS, ERRORS_TOTAL, REQUESTS_TOTAL,
};

use super::backoff::RetryBudget;
use super::circuit_breaker::{CircuitBreaker, CircuitOpenError};
use super::fault::{FailureClassifier, Fault};
use super::retry::{run_with_retry, RetryError};

/// Terminal error surface of an orchestrated call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The breaker denied admission; the operation was never invoked.
    #[error(transparent)]
    CircuitOpen(#[from] CircuitOpenError),

    /// Every attempt failed with a transient fault.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Fault,
    },

    /// A non-retryable fault ended the call.
    #[error("permanent upstream fault: {0}")]
    Permanent(#[source] Fault),

    /// An unclassified fault ended the call.
    #[error("unexpected upstream fault: {0}")]
    Unexpected(#[source] Fault),
}

impl CallError {
    /// Stable label for `requests_total{outcome}` and
    /// `errors_total{error_type}`.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::CircuitOpen(_) => "circuit_open",
            CallError::RetriesExhausted { .. } => "retries_exhausted",
            CallError::Permanent(_) => "permanent",
            CallError::Unexpected(_) => "unexpected",
        }
    }

    /// The underlying fault, when the dependency was actually called.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            CallError::CircuitOpen(_) => None,
            CallError::RetriesExhausted { source, .. } => Some(source),
            CallError::Permanent(fault) | CallError::Unexpected(fault) => Some(fault),
        }
    }
}

/// Composes the circuit breaker and retry policy around one async operation.
pub struct CallOrchestrator {
    breaker: Arc<CircuitBreaker>,
    budget: RetryBudget,
    classifier: FailureClassifier,
}

impl CallOrchestrator {
    pub fn new(
        breaker: Arc<CircuitBreaker>,
        budget: RetryBudget,
        classifier: FailureClassifier,
    ) -> Self {
        Self {
            breaker,
            budget,
            classifier,
        }
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Run `operation` under breaker admission and the retry budget.
    ///
    /// Each terminal outcome is counted exactly once; each attempt
    /// additionally increments a per-attempt diagnostic counter.
    pub async fn execute<T, F, Fut>(
        &self,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T, CallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Fault>>,
    {
        let started = Instant::now();

        if let Err(denied) = self.breaker.admit() {
            tracing::info!(
                operation = operation_name,
                service = %self.breaker.name(),
                "call rejected, circuit open"
            );
            let err = CallError::CircuitOpen(denied);
            self.record_terminal(err.kind());
            return Err(err);
        }

        let breaker = &self.breaker;
        let classifier = &self.classifier;
        let result = run_with_retry(&self.budget, classifier, |_attempt| {
            let fut = operation();
            async move {
                let attempt_started = Instant::now();
                let outcome = fut.await;
                histogram!(CALL_DURATION_SECONDS).record(attempt_started.elapsed().as_secs_f64());
                match &outcome {
                    Ok(_) => {
                        breaker.record_success();
                        counter!(ATTEMPTS_TOTAL, "outcome" => "success").increment(1);
                    }
                    Err(fault) => {
                        if classifier.counts_toward_breaker(fault) {
                            breaker.record_failure();
                        }
                        counter!(ATTEMPTS_TOTAL, "outcome" => fault.kind()).increment(1);
                    }
                }
                outcome
            }
        })
        .await;

        match result {
            Ok(value) => {
                counter!(REQUESTS_TOTAL, "outcome" => "success").increment(1);
                tracing::debug!(
                    operation = operation_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "call succeeded"
                );
                Ok(value)
            }
            Err(retry_err) => {
                let err = match retry_err {
                    RetryError::Exhausted { attempts, source } => CallError::RetriesExhausted {
                        attempts,
                        source,
                    },
                    RetryError::Permanent { source, .. } => match source {
                        Fault::Unexpected(_) => CallError::Unexpected(source),
                        _ => CallError::Permanent(source),
                    },
                };
                tracing::warn!(
                    operation = operation_name,
                    error = %err,
                    "call failed"
                );
                self.record_terminal(err.kind());
                Err(err)
            }
        }
    }

    fn record_terminal(&self, kind: &'static str) {
        counter!(REQUESTS_TOTAL, "outcome" => kind).increment(1);
        counter!(ERRORS_TOTAL, "error_type" => kind).increment(1);
    }
}
