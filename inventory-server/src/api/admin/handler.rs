//! Admin API Handlers

use axum::{Json, extract::State};
use shared::models::{DatabaseView, FixSoldResult, ImportRequest, ImportResult, OperationResult};

use crate::api::extract::ApiJson;
use crate::core::AppState;
use crate::services::{admin, import};
use crate::utils::AppResult;

/// GET /api/admin/database-view
pub async fn database_view(State(state): State<AppState>) -> AppResult<Json<DatabaseView>> {
    Ok(Json(admin::database_view(&state).await?))
}

/// POST /api/admin/reset-database
pub async fn reset_database(State(state): State<AppState>) -> AppResult<Json<OperationResult>> {
    Ok(Json(admin::reset(&state).await?))
}

/// POST /api/admin/fix-sold-watches
pub async fn fix_sold_watches(State(state): State<AppState>) -> AppResult<Json<FixSoldResult>> {
    Ok(Json(admin::fix_sold_watches(&state).await?))
}

/// POST /api/admin/import-customers
pub async fn import_customers(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ImportRequest>,
) -> AppResult<Json<ImportResult>> {
    Ok(Json(import::import_customers(&state, payload).await?))
}

/// POST /api/admin/import-watches
pub async fn import_watches(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ImportRequest>,
) -> AppResult<Json<ImportResult>> {
    Ok(Json(import::import_watches(&state, payload).await?))
}

/// POST /api/admin/import-suppliers
pub async fn import_suppliers(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ImportRequest>,
) -> AppResult<Json<ImportResult>> {
    Ok(Json(import::import_suppliers(&state, payload).await?))
}

/// POST /api/admin/import-sales
pub async fn import_sales(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ImportRequest>,
) -> AppResult<Json<ImportResult>> {
    Ok(Json(import::import_sales(&state, payload).await?))
}
