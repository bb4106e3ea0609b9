//! Customer service

use shared::error::ErrorCode;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

use super::not_found;
use crate::core::AppState;
use crate::error::ServiceResult;
use crate::utils::validate_payload;

pub async fn list(state: &AppState) -> ServiceResult<Vec<Customer>> {
    Ok(state.store().list_customers().await?)
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<Customer> {
    state
        .store()
        .find_customer(id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::CustomerNotFound, "Customer", id))
}

pub async fn create(state: &AppState, data: CustomerCreate) -> ServiceResult<Customer> {
    validate_payload(&data)?;
    let customer = state.store().create_customer(&data).await?;
    tracing::info!(customer_id = customer.id, "Customer created");
    Ok(customer)
}

pub async fn update(state: &AppState, id: i64, data: CustomerUpdate) -> ServiceResult<Customer> {
    validate_payload(&data)?;
    Ok(state.store().update_customer(id, &data).await?)
}

/// Refused while any watch or product sale references the customer
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    state.store().delete_customer(id).await?;
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(())
}
