//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub station: String,
    pub database: &'static str,
}

/// Liveness plus database reachability; 503 when the pool cannot answer
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, database) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => ("healthy", StatusCode::OK, "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            station: state.config.station.name.clone(),
            database,
        }),
    )
}
