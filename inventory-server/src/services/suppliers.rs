//! Supplier service

use shared::error::ErrorCode;
use shared::models::{Supplier, SupplierCreate};

use super::not_found;
use crate::core::AppState;
use crate::error::ServiceResult;
use crate::utils::validate_payload;

pub async fn list(state: &AppState) -> ServiceResult<Vec<Supplier>> {
    Ok(state.store().list_suppliers().await?)
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<Supplier> {
    state
        .store()
        .find_supplier(id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::SupplierNotFound, "Supplier", id))
}

pub async fn create(state: &AppState, data: SupplierCreate) -> ServiceResult<Supplier> {
    validate_payload(&data)?;
    let supplier = state.store().create_supplier(&data).await?;
    tracing::info!(supplier_id = supplier.id, "Supplier created");
    Ok(supplier)
}

/// 404 unless `id` is absent or names an existing supplier
pub(crate) async fn ensure_exists(state: &AppState, id: Option<i64>) -> ServiceResult<()> {
    if let Some(id) = id {
        get(state, id).await?;
    }
    Ok(())
}
