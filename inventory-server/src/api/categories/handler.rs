//! Product category API Handlers

use axum::{Json, extract::State};
use shared::models::{
    Category, CategoryField, CategoryInput, CategoryWithFields, FieldCreate, FieldReorder,
    FieldUpdate, OperationResult,
};

use crate::api::extract::{ApiJson, ApiPath};
use crate::core::AppState;
use crate::services::catalog;
use crate::utils::AppResult;

/// GET /api/product-categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(catalog::list_categories(&state).await?))
}

/// GET /api/product-categories/:id - category plus ordered fields
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<CategoryWithFields>> {
    Ok(Json(catalog::get_category(&state, id).await?))
}

/// POST /api/product-categories
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> AppResult<Json<Category>> {
    Ok(Json(catalog::create_category(&state, payload).await?))
}

/// PUT /api/product-categories/:id
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> AppResult<Json<Category>> {
    Ok(Json(catalog::update_category(&state, id, payload).await?))
}

/// DELETE /api/product-categories/:id - refused while products use it
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<OperationResult>> {
    catalog::delete_category(&state, id).await?;
    Ok(Json(OperationResult::ok()))
}

/// GET /api/product-categories/:id/fields
pub async fn list_fields(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Vec<CategoryField>>> {
    Ok(Json(catalog::list_fields(&state, id).await?))
}

/// POST /api/product-categories/:id/fields
pub async fn create_field(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<FieldCreate>,
) -> AppResult<Json<CategoryField>> {
    Ok(Json(catalog::create_field(&state, id, payload).await?))
}

/// PUT /api/product-categories/:id/fields/reorder
pub async fn reorder_fields(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<FieldReorder>,
) -> AppResult<Json<Vec<CategoryField>>> {
    Ok(Json(catalog::reorder_fields(&state, id, payload.field_ids).await?))
}

/// PUT /api/category-fields/:id
pub async fn update_field(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<FieldUpdate>,
) -> AppResult<Json<CategoryField>> {
    Ok(Json(catalog::update_field(&state, id, payload).await?))
}

/// DELETE /api/category-fields/:id - drops the stored values too
pub async fn delete_field(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<OperationResult>> {
    catalog::delete_field(&state, id).await?;
    Ok(Json(OperationResult::ok()))
}
