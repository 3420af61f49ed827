//! quote-gateway entrypoint.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                  QUOTE GATEWAY                    │
//!                 │                                                   │
//!  Client ───────▶│  http/server ──▶ http/handlers                    │
//!                 │                       │                           │
//!                 │                       ▼                           │
//!                 │              resilience/orchestrator              │
//!                 │              admit ─▶ retry ─▶ record             │
//!                 │               │                 │                 │
//!                 │      circuit_breaker       upstream/client ───────┼──▶ market-data API
//!                 │                                                   │
//!                 │  config · observability (tracing, Prometheus)     │
//!                 │  lifecycle (graceful shutdown)                    │
//!                 └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use quote_gateway::config::{load_config, GatewayConfig};
use quote_gateway::lifecycle::Shutdown;
use quote_gateway::observability;
use quote_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "quote-gateway", version, about = "Resilient market-data quote gateway")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        fail_max = config.circuit_breaker.fail_max,
        max_attempts = config.retries.max_attempts,
        "quote-gateway starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        observability::metrics::init_metrics(addr)?;
        tracing::info!(address = %addr, "Prometheus exporter listening");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
