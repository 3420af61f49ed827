//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → orchestrator.rs (execute: admit, retry, record, report)
//!     → circuit_breaker/ (fail fast when the dependency is degraded)
//!     → retry.rs + backoff.rs (bounded retries for transient faults)
//!     → fault.rs (classification consulted by both layers)
//! ```
//!
//! # Design Decisions
//! - Classification is the single source of truth for retry and breaker
//!   accounting
//! - The breaker decides per call whether a call is attempted at all,
//!   independent of the retry budget
//! - Expected failures are typed results, never panics

pub mod backoff;
pub mod circuit_breaker;
pub mod fault;
pub mod orchestrator;
pub mod retry;

pub use backoff::RetryBudget;
pub use circuit_breaker::{
    BreakerConfig, BreakerRegistry, CircuitBreaker, CircuitOpenError, CircuitState,
};
pub use fault::{FailureClassifier, Fault, FaultClass};
pub use orchestrator::{CallError, CallOrchestrator};
pub use retry::{run_with_retry, RetryError};
