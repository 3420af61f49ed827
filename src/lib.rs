//! Resilient gateway for external market-data quotes.
//!
//! Wraps an unreliable market-data API behind a circuit breaker and a
//! bounded exponential-backoff retry policy, with Prometheus metrics and
//! structured logging around every call.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
