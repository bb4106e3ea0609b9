//! Watch sale service

use chrono::Utc;
use shared::models::{Sale, SaleCreate};

use crate::core::AppState;
use crate::db::NewSale;
use crate::error::ServiceResult;
use crate::utils::validate_payload;

pub async fn list(state: &AppState) -> ServiceResult<Vec<Sale>> {
    Ok(state.store().list_sales().await?)
}

/// Record a sale: the sale row, the customer's running total and the
/// watch's sold flag change together or not at all
pub async fn create(state: &AppState, data: SaleCreate) -> ServiceResult<Sale> {
    validate_payload(&data)?;
    let new = NewSale {
        customer_id: data.customer_id,
        watch_id: data.watch_id,
        sale_date: data.sale_date.unwrap_or_else(Utc::now),
        sale_price: data.sale_price,
    };
    let sale = state.store().record_sale(&new).await?;
    tracing::info!(
        sale_id = sale.id,
        watch_id = sale.watch_id,
        customer_id = sale.customer_id,
        "Watch sold"
    );
    Ok(sale)
}
