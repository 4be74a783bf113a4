use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use deercheck_core::ReorderDto;
use deercheck_store::lookup::{previous_order_by_id, previous_order_by_phone};
use deercheck_store::Store;
use serde_json::json;
use tracing::debug;

use crate::error::{AppError, ORDER_ID_REQUIRED, PHONE_REQUIRED};
use crate::AppState;

pub async fn previous_order_handler(
    State(state): State<AppState>,
    order_id: Result<Path<String>, PathRejection>,
) -> Result<Json<ReorderDto>, AppError> {
    let Path(order_id) = order_id.map_err(|rejection| {
        debug!(error = %rejection, "order id rejected");
        AppError::InvalidInput(ORDER_ID_REQUIRED)
    })?;
    let dto = with_store(&state, move |store| {
        previous_order_by_id(store, &order_id).map_err(AppError::from)
    })
    .await?;
    Ok(Json(dto))
}

pub async fn previous_order_by_phone_handler(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<ReorderDto>, AppError> {
    let Query(params) = params.map_err(|_| AppError::InvalidInput(PHONE_REQUIRED))?;
    let phone = params
        .get("phone")
        .cloned()
        .ok_or(AppError::InvalidInput(PHONE_REQUIRED))?;
    let dto = with_store(&state, move |store| {
        previous_order_by_phone(store, &phone).map_err(AppError::from)
    })
    .await?;
    Ok(Json(dto))
}

pub async fn missing_order_id_handler() -> AppError {
    AppError::InvalidInput(ORDER_ID_REQUIRED)
}

pub async fn method_not_allowed_handler() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn unknown_route_handler() -> AppError {
    AppError::UnknownRoute
}

pub async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Runs a blocking store call off the async workers.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> Result<T, AppError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || {
        let guard = store
            .lock()
            .map_err(|_| AppError::Task("store mutex poisoned".to_string()))?;
        f(&guard)
    })
    .await
    .map_err(|err| AppError::Task(err.to_string()))?
}
