//! Upstream market-data integration.

pub mod client;
pub mod schema;

pub use client::MarketDataClient;
pub use schema::AssetTick;
