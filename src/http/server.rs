//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request metrics)
//! - Build the resilience core and inject it into handler state
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::observability::metrics;
use crate::resilience::{BreakerRegistry, CallOrchestrator, CircuitBreaker};
use crate::upstream::client::BuildError;
use crate::upstream::MarketDataClient;

use super::handlers;

/// Identity of the guarded market-data dependency.
pub const MARKET_DATA_SERVICE: &str = "market_data";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CallOrchestrator>,
    pub client: Arc<MarketDataClient>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    registry: Arc<BreakerRegistry>,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, BuildError> {
        let client = Arc::new(MarketDataClient::new(&config.upstream)?);

        let registry = Arc::new(BreakerRegistry::new(
            config.circuit_breaker.breaker_config(),
        ));
        let breaker = registry.get(MARKET_DATA_SERVICE);
        let orchestrator = Arc::new(CallOrchestrator::new(
            breaker,
            config.retries.budget(),
            config.circuit_breaker.classifier(),
        ));

        let state = AppState {
            orchestrator,
            client,
        };
        let router = Self::build_router(&config, state);

        Ok(Self { router, registry })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::health))
            .route("/api/v1/finance/active/{asset}", get(handlers::get_active))
            .with_state(state)
            .layer(middleware::from_fn(track_http_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Breaker guarding the market-data dependency.
    pub fn market_data_breaker(&self) -> Arc<CircuitBreaker> {
        self.registry.get(MARKET_DATA_SERVICE)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record counter and duration for every inbound request.
async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}
