//! HTTP routes for the web server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::shared::WorldSnapshot;
use crate::stats::Stats;

use super::state::AppState;

/// Create the API router
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/game_state", get(game_state))
        .route("/reset_simulation", post(reset_simulation))
        .route("/api/stats", get(current_stats))
        .route("/api/stats/history", get(stats_history))
}

// --- State ---

pub(crate) async fn game_state(State(state): State<Arc<AppState>>) -> Json<WorldSnapshot> {
    Json(state.sim.snapshot().await)
}

// --- Simulation Control ---

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
}

pub(crate) async fn reset_simulation(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ResetResponse>) {
    if state.sim.reset().await {
        (
            StatusCode::OK,
            Json(ResetResponse {
                status: "success".to_string(),
                message: "Simulation reset".to_string(),
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResetResponse {
                status: "error".to_string(),
                message: "Failed to reset simulation".to_string(),
            }),
        )
    }
}

// --- Statistics ---

pub(crate) async fn current_stats(State(state): State<Arc<AppState>>) -> Json<Stats> {
    Json(state.sim.snapshot().await.stats)
}

pub(crate) async fn stats_history(State(state): State<Arc<AppState>>) -> Json<Vec<Stats>> {
    Json(state.sim.stats_history().await)
}
