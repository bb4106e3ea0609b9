//! Watch API Handlers

use axum::{Json, extract::State};
use shared::models::{OperationResult, PriceHistory, PriceUpdate, Watch, WatchCreate, WatchUpdate};

use crate::api::extract::{ApiJson, ApiPath};
use crate::core::AppState;
use crate::services::watches;
use crate::utils::AppResult;

/// GET /api/watches
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Watch>>> {
    Ok(Json(watches::list(&state).await?))
}

/// GET /api/watches/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Watch>> {
    Ok(Json(watches::get(&state, id).await?))
}

/// POST /api/watches
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WatchCreate>,
) -> AppResult<Json<Watch>> {
    Ok(Json(watches::create(&state, payload).await?))
}

/// PUT | PATCH /api/watches/:id
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<WatchUpdate>,
) -> AppResult<Json<Watch>> {
    Ok(Json(watches::update(&state, id, payload).await?))
}

/// PATCH /api/watches/:id/price
pub async fn update_price(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<PriceUpdate>,
) -> AppResult<Json<Watch>> {
    Ok(Json(watches::update_price(&state, id, payload).await?))
}

/// DELETE /api/watches/:id
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<OperationResult>> {
    watches::delete(&state, id).await?;
    Ok(Json(OperationResult::ok()))
}

/// POST /api/watches/:id/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Watch>> {
    Ok(Json(watches::duplicate(&state, id).await?))
}

/// GET /api/watches/:id/price-history
pub async fn price_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Vec<PriceHistory>>> {
    Ok(Json(watches::price_history(&state, id).await?))
}
