//! Breaker state types and configuration.

use std::time::Duration;
use tokio::time::Instant;

/// Circuit breaker state.
///
/// ```text
/// Closed → Open: failure_count reaches fail_max
/// Open → Half-Open: reset_timeout elapsed, one trial call admitted
/// Half-Open → Closed: trial succeeds
/// Half-Open → Open: trial fails, timeout window restarts
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through.
    Closed,
    /// Dependency assumed down, calls fail fast.
    Open,
    /// Testing recovery with a single trial call.
    HalfOpen,
}

impl CircuitState {
    /// Value exported on the `circuit_breaker_state` gauge.
    pub fn as_gauge(&self) -> f64 {
        match self {
            CircuitState::Closed => 0.0,
            CircuitState::Open => 1.0,
            CircuitState::HalfOpen => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half-open",
        }
    }
}

/// Mutable bookkeeping for one breaker, guarded by its state store.
///
/// Invariants: `opened_at` is `Some` iff the circuit is `Open`;
/// `failure_count` is reset on every transition to `Closed`.
#[derive(Debug, Clone)]
pub struct BreakerState {
    pub circuit: CircuitState,
    pub failure_count: u32,
    pub opened_at: Option<Instant>,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self {
            circuit: CircuitState::Closed,
            failure_count: 0,
            opened_at: None,
        }
    }
}

/// Configuration for one breaker instance.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens (>= 1).
    pub fail_max: u32,
    /// How long the circuit stays open before a trial call.
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            fail_max: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}
