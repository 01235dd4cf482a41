//! Handlers for sensors nested under `/modules/{id}/sensors`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sensorhub_core::module::{Confirmation, Sensor};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

/// POST /modules/{id}/sensors
pub async fn add(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    JsonBody(input): JsonBody<Value>,
) -> AppResult<(StatusCode, Json<Sensor>)> {
    let sensor = state
        .store
        .add_sensor(&module_id, &input)
        .await
        .map_err(AppError::rejected)?;
    Ok((StatusCode::CREATED, Json(sensor)))
}

/// GET /modules/{id}/sensors/{sid}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((module_id, sensor_id)): Path<(String, String)>,
) -> AppResult<Json<Sensor>> {
    let sensor = state.store.get_sensor(&module_id, &sensor_id).await?;
    Ok(Json(sensor))
}

/// PUT /modules/{id}/sensors/{sid}
///
/// Validation failures are 400 and a missing module or sensor is 404.
pub async fn update(
    State(state): State<AppState>,
    Path((module_id, sensor_id)): Path<(String, String)>,
    JsonBody(input): JsonBody<Value>,
) -> AppResult<Json<Sensor>> {
    let sensor = state
        .store
        .update_sensor(&module_id, &sensor_id, &input)
        .await?;
    Ok(Json(sensor))
}

/// DELETE /modules/{id}/sensors/{sid}
pub async fn delete(
    State(state): State<AppState>,
    Path((module_id, sensor_id)): Path<(String, String)>,
) -> AppResult<Json<Confirmation>> {
    let confirmation = state.store.delete_sensor(&module_id, &sensor_id).await?;
    Ok(Json(confirmation))
}
