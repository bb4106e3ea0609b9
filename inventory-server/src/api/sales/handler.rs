//! Sale API Handlers

use axum::{Json, extract::State};
use shared::models::{Sale, SaleCreate};

use crate::api::extract::ApiJson;
use crate::core::AppState;
use crate::services::sales;
use crate::utils::AppResult;

/// GET /api/sales
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Sale>>> {
    Ok(Json(sales::list(&state).await?))
}

/// POST /api/sales - sale, customer total and sold flag in one step
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaleCreate>,
) -> AppResult<Json<Sale>> {
    Ok(Json(sales::create(&state, payload).await?))
}
