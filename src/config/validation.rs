//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds >= 1, delays > 0)
//! - Check addresses and URLs parse before the system accepts the config
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use super::schema::GatewayConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is not a valid socket address: {0}")]
    BindAddress(String),

    #[error("upstream.base_url is not a valid URL: {0}")]
    BaseUrl(String),

    #[error("{0} must be at least 1")]
    BelowMinimum(&'static str),

    #[error("retries.max_delay_ms must be >= retries.base_delay_ms")]
    DelayCapBelowBase,

    #[error("retries.multiplier must be at least 1.0")]
    Multiplier,

    #[error("observability.metrics_address is not a valid socket address: {0}")]
    MetricsAddress(String),

    #[error("observability.log_level must be one of trace/debug/info/warn/error, got: {0}")]
    LogLevel(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::BelowMinimum("listener.request_timeout_secs"));
    }

    if Url::parse(&config.upstream.base_url).is_err() {
        errors.push(ValidationError::BaseUrl(config.upstream.base_url.clone()));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::BelowMinimum("upstream.connect_timeout_secs"));
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::BelowMinimum("upstream.request_timeout_secs"));
    }

    if config.circuit_breaker.fail_max == 0 {
        errors.push(ValidationError::BelowMinimum("circuit_breaker.fail_max"));
    }
    if config.circuit_breaker.reset_timeout_secs == 0 {
        errors.push(ValidationError::BelowMinimum(
            "circuit_breaker.reset_timeout_secs",
        ));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::BelowMinimum("retries.max_attempts"));
    }
    if config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::BelowMinimum("retries.base_delay_ms"));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::DelayCapBelowBase);
    }
    if config.retries.multiplier < 1.0 {
        errors.push(ValidationError::Multiplier);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
