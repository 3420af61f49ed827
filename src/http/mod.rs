//! HTTP layer.
//!
//! # Design Decisions
//! - Handlers decide nothing about resilience; they call the orchestrator
//!   and translate its typed result into a response
//! - Status-code mapping for orchestrator errors lives in response.rs

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{AppState, GatewayServer, MARKET_DATA_SERVICE};
