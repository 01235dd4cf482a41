//! Handlers for the `/modules` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sensorhub_core::module::{Confirmation, Module};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

/// POST /modules/
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<Value>,
) -> AppResult<(StatusCode, Json<Module>)> {
    let module = state
        .store
        .create(&input)
        .await
        .map_err(AppError::rejected)?;
    Ok((StatusCode::CREATED, Json(module)))
}

/// GET /modules/
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Module>>> {
    let modules = state.store.list_all().await?;
    Ok(Json(modules))
}

/// GET /modules/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> AppResult<Json<Module>> {
    let module = state.store.get(&module_id).await?;
    Ok(Json(module))
}

/// PUT /modules/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    JsonBody(input): JsonBody<Value>,
) -> AppResult<Json<Module>> {
    let module = state
        .store
        .update_module(&module_id, &input)
        .await
        .map_err(AppError::rejected)?;
    Ok(Json(module))
}

/// DELETE /modules/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> AppResult<Json<Confirmation>> {
    let confirmation = state.store.delete_module(&module_id).await?;
    Ok(Json(confirmation))
}
