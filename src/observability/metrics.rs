//! Metric definitions and Prometheus exposition.
//!
//! # Metrics
//! - `quote_gateway_requests_total{outcome}`: orchestrated calls by outcome
//! - `quote_gateway_attempts_total{outcome}`: individual attempts (diagnostics)
//! - `quote_gateway_errors_total{error_type}`: terminal call failures
//! - `quote_gateway_call_duration_seconds`: per-attempt upstream latency
//! - `quote_gateway_http_requests_total{method,path,status}`: inbound traffic
//! - `quote_gateway_http_request_duration_seconds{method,path}`
//! - `quote_gateway_circuit_breaker_state{service}`: 0=closed, 1=open, 2=half-open
//! - `quote_gateway_circuit_breaker_failure_count{service}`
//! - `quote_gateway_circuit_breaker_tripped_total{service}`

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, histogram, Unit,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "quote_gateway_requests_total";
pub const ATTEMPTS_TOTAL: &str = "quote_gateway_attempts_total";
pub const ERRORS_TOTAL: &str = "quote_gateway_errors_total";
pub const CALL_DURATION_SECONDS: &str = "quote_gateway_call_duration_seconds";
pub const HTTP_REQUESTS_TOTAL: &str = "quote_gateway_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "quote_gateway_http_request_duration_seconds";
pub const CIRCUIT_BREAKER_STATE: &str = "quote_gateway_circuit_breaker_state";
pub const CIRCUIT_BREAKER_FAILURE_COUNT: &str = "quote_gateway_circuit_breaker_failure_count";
pub const CIRCUIT_BREAKER_TRIPPED_TOTAL: &str = "quote_gateway_circuit_breaker_tripped_total";

/// Install the Prometheus exporter on its own listener and register
/// metric descriptions.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    describe_counter!(REQUESTS_TOTAL, "Orchestrated upstream calls by outcome");
    describe_counter!(ATTEMPTS_TOTAL, "Individual upstream attempts by outcome");
    describe_counter!(ERRORS_TOTAL, "Terminal upstream call failures by type");
    describe_histogram!(
        CALL_DURATION_SECONDS,
        Unit::Seconds,
        "Duration of individual upstream attempts"
    );
    describe_counter!(HTTP_REQUESTS_TOTAL, "Inbound HTTP requests");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Duration of inbound HTTP requests"
    );
    describe_gauge!(
        CIRCUIT_BREAKER_STATE,
        "Circuit breaker state (0=closed, 1=open, 2=half-open)"
    );
    describe_gauge!(
        CIRCUIT_BREAKER_FAILURE_COUNT,
        "Current consecutive-failure count per circuit breaker"
    );
    describe_counter!(
        CIRCUIT_BREAKER_TRIPPED_TOTAL,
        "Times a circuit breaker has opened from the closed state"
    );

    Ok(())
}

/// Record one inbound HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(elapsed.as_secs_f64());
}
