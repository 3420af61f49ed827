//! Circuit breaker state machine.
//!
//! # Design Decisions
//! - One breaker per guarded dependency, never global
//! - Fail fast while Open: admission is denied without touching the network
//! - Exactly one trial call in Half-Open
//! - Transition side effects (log event, gauges, tripped counter) fire once
//!   per actual transition, inside the store's serialization point

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge};
use thiserror::Error;
use tokio::time::Instant;

use crate::observability::metrics::{
    CIRCUIT_BREAKER_FAILURE_COUNT, CIRCUIT_BREAKER_STATE, CIRCUIT_BREAKER_TRIPPED_TOTAL,
};

use super::state::{BreakerConfig, BreakerState, CircuitState};
use super::store::{BreakerStateStore, InMemoryStateStore};

/// Admission was denied because the circuit is open.
///
/// Distinct from the guarded operation's own faults: the dependency was
/// never called. The retry policy must not retry it.
#[derive(Debug, Error)]
#[error("circuit breaker for '{service}' is open")]
pub struct CircuitOpenError {
    pub service: String,
}

/// Guards calls to one logical dependency.
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    store: Arc<dyn BreakerStateStore>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self::with_store(name, config, Arc::new(InMemoryStateStore::default()))
    }

    pub fn with_store(
        name: impl Into<String>,
        config: BreakerConfig,
        store: Arc<dyn BreakerStateStore>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            store,
        }
    }

    /// Identity of the dependency this breaker guards.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CircuitState {
        self.store.snapshot().circuit
    }

    pub fn failure_count(&self) -> u32 {
        self.store.snapshot().failure_count
    }

    /// Decide whether a call may proceed.
    ///
    /// An Open circuit whose reset timeout has elapsed transitions to
    /// Half-Open and admits exactly the calling operation as the trial;
    /// every other caller is denied until that trial's outcome is recorded.
    pub fn admit(&self) -> Result<(), CircuitOpenError> {
        let mut admitted = false;
        self.store.update(&mut |s| match s.circuit {
            CircuitState::Closed => admitted = true,
            CircuitState::Open => {
                let elapsed = s
                    .opened_at
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.config.reset_timeout {
                    s.circuit = CircuitState::HalfOpen;
                    s.opened_at = None;
                    self.publish_state(s);
                    tracing::info!(
                        service = %self.name,
                        "circuit breaker half-open, admitting trial call"
                    );
                    admitted = true;
                }
            }
            CircuitState::HalfOpen => {}
        });

        if admitted {
            Ok(())
        } else {
            Err(CircuitOpenError {
                service: self.name.clone(),
            })
        }
    }

    /// Record a successful outcome for an admitted call.
    pub fn record_success(&self) {
        self.store.update(&mut |s| match s.circuit {
            CircuitState::Closed => {
                if s.failure_count != 0 {
                    s.failure_count = 0;
                    self.publish_failure_count(s);
                }
            }
            CircuitState::HalfOpen => {
                s.circuit = CircuitState::Closed;
                s.failure_count = 0;
                s.opened_at = None;
                self.publish_state(s);
                self.publish_failure_count(s);
                tracing::info!(service = %self.name, "circuit breaker closed after successful trial");
            }
            // Late success from a call admitted before the trip. Recovery is
            // only proven by the half-open trial.
            CircuitState::Open => {}
        });
    }

    /// Record a failed outcome for an admitted call.
    pub fn record_failure(&self) {
        self.store.update(&mut |s| match s.circuit {
            CircuitState::Closed => {
                s.failure_count += 1;
                self.publish_failure_count(s);
                if s.failure_count >= self.config.fail_max {
                    s.circuit = CircuitState::Open;
                    s.opened_at = Some(Instant::now());
                    self.publish_state(s);
                    counter!(CIRCUIT_BREAKER_TRIPPED_TOTAL, "service" => self.name.clone())
                        .increment(1);
                    tracing::warn!(
                        service = %self.name,
                        failures = s.failure_count,
                        "circuit breaker opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                s.circuit = CircuitState::Open;
                s.opened_at = Some(Instant::now());
                self.publish_state(s);
                tracing::warn!(
                    service = %self.name,
                    "trial call failed, circuit breaker reopened"
                );
            }
            // Late failure from a call admitted before the trip.
            CircuitState::Open => {}
        });
    }

    fn publish_state(&self, s: &BreakerState) {
        gauge!(CIRCUIT_BREAKER_STATE, "service" => self.name.clone()).set(s.circuit.as_gauge());
    }

    fn publish_failure_count(&self, s: &BreakerState) {
        gauge!(CIRCUIT_BREAKER_FAILURE_COUNT, "service" => self.name.clone())
            .set(s.failure_count as f64);
    }
}
