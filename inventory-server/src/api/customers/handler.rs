//! Customer API Handlers

use axum::{Json, extract::State};
use shared::models::{Customer, CustomerCreate, CustomerUpdate, OperationResult};

use crate::api::extract::{ApiJson, ApiPath};
use crate::core::AppState;
use crate::services::customers;
use crate::utils::AppResult;

/// GET /api/customers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(customers::list(&state).await?))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Customer>> {
    Ok(Json(customers::get(&state, id).await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    Ok(Json(customers::create(&state, payload).await?))
}

/// PUT /api/customers/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    Ok(Json(customers::update(&state, id, payload).await?))
}

/// DELETE /api/customers/:id - refused while sales reference the customer
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<OperationResult>> {
    customers::delete(&state, id).await?;
    Ok(Json(OperationResult::ok()))
}
