//! Health check endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Static service identity; never touches the chain
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub framework: String,
    pub model: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let info = &state.info;
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        service: info.name.clone(),
        framework: format!("{} {}", info.framework, info.version),
        model: info.model.clone(),
    };

    (StatusCode::OK, Json(response))
}
