//! Supplier API Handlers

use axum::{Json, extract::State};
use shared::models::{Supplier, SupplierCreate};

use crate::api::extract::{ApiJson, ApiPath};
use crate::core::AppState;
use crate::services::suppliers;
use crate::utils::AppResult;

/// GET /api/suppliers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    Ok(Json(suppliers::list(&state).await?))
}

/// GET /api/suppliers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(suppliers::get(&state, id).await?))
}

/// POST /api/suppliers
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SupplierCreate>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(suppliers::create(&state, payload).await?))
}
