use crate::{app::AppState, routes::{ok, Envelope}};
use axum::extract::State;
use serde::{Deserialize, Serialize};

/// Health report
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

/// GET /health
///
/// Always 200; a database outage shows up as `degraded` rather than an error so
/// load balancers can tell the process is alive.
pub async fn health_check(State(state): State<AppState>) -> Envelope<HealthResponse> {
    let connected = taskboard_shared::db::pool::health_check(&state.db).await.is_ok();

    ok(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    })
}
