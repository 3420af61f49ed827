//! Circuit breaker for upstream dependency protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: testing recovery with a single trial call

mod breaker;
mod registry;
mod state;
mod store;

pub use breaker::{CircuitBreaker, CircuitOpenError};
pub use registry::BreakerRegistry;
pub use state::{BreakerConfig, BreakerState, CircuitState};
pub use store::{BreakerStateStore, InMemoryStateStore};

#[cfg(test)]
mod tests;
