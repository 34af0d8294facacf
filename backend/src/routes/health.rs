//! Health check endpoints
//!
//! - /health - basic health check
//! - /health/ready - readiness probe (checks the database)
//! - /health/live - liveness probe
//!
//! These sit outside the API-key gate so orchestrators can probe them.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health probe response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

fn respond(status: &str, database: Option<String>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    respond("healthy", None)
}

/// Readiness probe; returns 503 while the database is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(&state.db).await {
        Ok(_) => Ok(respond("ready", Some("healthy".to_string()))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            respond("not_ready", Some(e.to_string())),
        )),
    }
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    respond("alive", None)
}
