//! Client for the external market-data API.
//!
//! Every failure is mapped to a [`Fault`] so the resilience core can
//! classify it; this module never retries or logs terminal errors itself.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::resilience::Fault;

use super::schema::{AssetTick, TickEnvelope};

/// Failed to construct the client from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Typed client for the market-data API.
pub struct MarketDataClient {
    http: reqwest::Client,
    base_url: Url,
    market: String,
}

impl MarketDataClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, BuildError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            http,
            base_url,
            market: config.market.clone(),
        })
    }

    /// Fetch the latest tick for one instrument.
    pub async fn latest_tick(&self, instrument: &str) -> Result<AssetTick, Fault> {
        let mut url = self
            .base_url
            .join("index/cc/v1/latest/tick")
            .map_err(|e| Fault::Unexpected(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("market", &self.market)
            .append_pair("instruments", instrument)
            .append_pair("apply_mapping", "true");

        tracing::debug!(%url, "fetching latest tick");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Fault::Status(status.as_u16()));
        }

        let envelope: TickEnvelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Fault::Timeout
            } else {
                Fault::Decode(e.to_string())
            }
        })?;

        envelope
            .data
            .get(instrument)
            .cloned()
            .ok_or_else(|| Fault::Decode(format!("instrument '{instrument}' missing from response")))
    }
}

fn map_transport_error(err: reqwest::Error) -> Fault {
    if err.is_timeout() {
        Fault::Timeout
    } else if err.is_connect() {
        Fault::Connect(err.to_string())
    } else {
        Fault::Unexpected(err.to_string())
    }
}
