use crate::error::ApiError;
use crate::server::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use trademind_backtest::{
    simulate, simulate_seeded, ProfileRequest, ProfileSummary, SimulationRequest,
    SimulationResult,
};

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Reports that the service is up.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "TradeMind Quant Engine Online",
    })
}

/// Runs a Monte Carlo simulation and returns the equity cone.
///
/// The simulation is CPU-bound, so it runs on the blocking thread pool with
/// its own random source.
///
/// # Errors
/// Returns `ApiError::InvalidRequest` (400) for invalid input, or
/// `ApiError::Internal` (500) for an internal engine error or if the
/// simulation task dies.
pub async fn run_simulation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulationRequest>,
) -> Result<Json<SimulationResult>, ApiError> {
    let params = req.into_parameters(&state.limits)?;
    let seed = req.seed;

    tracing::info!(
        paths = params.num_paths,
        steps = params.num_steps,
        seeded = seed.is_some(),
        "running simulation"
    );

    let result = tokio::task::spawn_blocking(move || match seed {
        Some(seed) => simulate_seeded(&params, seed),
        None => simulate(&params),
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(result))
}

/// Returns the closed-form expectancy profile for a set of trade statistics.
///
/// # Errors
/// Returns `ApiError::InvalidRequest` (400) if the statistics are invalid.
pub async fn strategy_profile(
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileSummary>, ApiError> {
    Ok(Json(ProfileSummary::try_from(&req)?))
}
