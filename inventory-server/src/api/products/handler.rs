//! Product API Handlers

use axum::{Json, extract::State};
use shared::models::{
    FieldStat, FieldStatsQuery, ImportResult, OperationResult, ProductCreate, ProductDetail,
    ProductFilter, ProductImportRequest, ProductSale, ProductSell, ProductUpdate,
};

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::core::AppState;
use crate::services::{import, products, stats};
use crate::utils::AppResult;

/// GET /api/products?categoryId=&sold=
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> AppResult<Json<Vec<ProductDetail>>> {
    Ok(Json(products::list(&state, filter).await?))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(products::get(&state, id).await?))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductCreate>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(products::create(&state, payload).await?))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(products::update(&state, id, payload).await?))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<OperationResult>> {
    products::delete(&state, id).await?;
    Ok(Json(OperationResult::ok()))
}

/// PATCH /api/products/:id/sold
pub async fn sell(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProductSell>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(products::sell(&state, id, payload).await?))
}

/// GET /api/products/:id/sales
pub async fn sales(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Vec<ProductSale>>> {
    Ok(Json(products::sales(&state, id).await?))
}

/// GET /api/products/stats?categoryId=&field=&period=
pub async fn field_stats(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FieldStatsQuery>,
) -> AppResult<Json<Vec<FieldStat>>> {
    Ok(Json(stats::field_stats(&state, query).await?))
}

/// POST /api/products/import
pub async fn import(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductImportRequest>,
) -> AppResult<Json<ImportResult>> {
    Ok(Json(import::import_products(&state, payload).await?))
}
