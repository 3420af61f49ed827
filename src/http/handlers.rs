//! Request handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::upstream::AssetTick;

use super::response::ApiError;
use super::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub circuit: &'static str,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub asset: String,
    pub data: AssetTick,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        circuit: state.orchestrator.breaker().state().as_str(),
    })
}

/// Fetch the latest quote for an asset through the resilience core.
pub async fn get_active(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let client = state.client.clone();
    let lookup = asset.clone();
    let tick = state
        .orchestrator
        .execute("latest_tick", move || {
            let client = client.clone();
            let asset = lookup.clone();
            async move { client.latest_tick(&asset).await }
        })
        .await?;

    Ok(Json(QuoteResponse { asset, data: tick }))
}
