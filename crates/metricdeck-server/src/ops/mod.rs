//! Operational HTTP endpoints.
//!
//! - `/health` : application liveness plus a storage ping

use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::transport::contracts::HealthCheckResponse;
use crate::transport::error::ApiError;

#[tracing::instrument(name = "operation", skip(state), fields(operation = "get_health"))]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>, ApiError> {
    tracing::info!("endpoint called");
    let database = state.health().check().await?;
    Ok(Json(HealthCheckResponse {
        application: true,
        database,
    }))
}
