//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; level from config, `RUST_LOG` override
//! - Metrics are cheap atomic updates behind the `metrics` facade
//! - Prometheus exposition runs on its own listener, separate from the API

pub mod logging;
pub mod metrics;
