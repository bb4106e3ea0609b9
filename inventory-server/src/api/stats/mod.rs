//! Dashboard statistics

use axum::{Json, Router, extract::State, routing::get};
use shared::models::Overview;

use crate::core::AppState;
use crate::services::stats;
use crate::utils::AppResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats/overview", get(overview))
}

/// GET /api/stats/overview
pub async fn overview(State(state): State<AppState>) -> AppResult<Json<Overview>> {
    Ok(Json(stats::overview(&state).await?))
}
