//! Health endpoint.
//!
//! Probes use it to confirm the API is up and its store answers.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{HEALTH_MESSAGE, HealthStatus};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses(
        (status = 200, description = "API and store are healthy", body = HealthStatus),
        (status = 500, description = "Store unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        return Err(api_internal("Storage unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        message: HEALTH_MESSAGE.to_string(),
    }))
}
