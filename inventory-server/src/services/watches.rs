//! Watch service
//!
//! Fixed-schema watches with generated product codes and a price log that
//! grows whenever the selling price changes.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use shared::coerce::json_decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{PriceHistory, PriceUpdate, Watch, WatchCreate, WatchUpdate};
use shared::util::product_code;

use super::{not_found, suppliers, with_fresh_code};
use crate::core::AppState;
use crate::db::{NewWatch, RepoError};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::validate_payload;

pub async fn list(state: &AppState) -> ServiceResult<Vec<Watch>> {
    Ok(state.store().list_watches().await?)
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<Watch> {
    state
        .store()
        .find_watch(id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::WatchNotFound, "Watch", id))
}

/// Insert a validated watch; the code comes from the payload or the brand
pub async fn create(state: &AppState, data: WatchCreate) -> ServiceResult<Watch> {
    validate_payload(&data)?;
    suppliers::ensure_exists(state, data.supplier_id).await?;

    let given = data
        .product_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let watch = match given {
        Some(code) => {
            let new = NewWatch {
                data,
                product_code: code.clone(),
                added_at: Utc::now(),
            };
            state.store().create_watch(&new).await.map_err(|e| match e {
                RepoError::Duplicate(_) => {
                    AppError::already_exists(format!("Product code {code}")).into()
                }
                other => ServiceError::from(other),
            })?
        }
        None => insert_generated(state, data, None).await?,
    };

    tracing::info!(watch_id = watch.id, code = %watch.product_code, "Watch created");
    Ok(watch)
}

async fn insert_generated(
    state: &AppState,
    data: WatchCreate,
    suffix: Option<&str>,
) -> ServiceResult<Watch> {
    let store = state.store();
    let brand = data.brand.clone();
    with_fresh_code(
        state.config.product_code_attempts,
        || product_code(&brand, suffix),
        |code| {
            let new = NewWatch {
                data: data.clone(),
                product_code: code,
                added_at: Utc::now(),
            };
            async move { store.create_watch(&new).await }
        },
    )
    .await
}

/// Partial update (PUT and PATCH share it)
pub async fn update(state: &AppState, id: i64, data: WatchUpdate) -> ServiceResult<Watch> {
    validate_payload(&data)?;
    suppliers::ensure_exists(state, data.supplier_id).await?;
    Ok(state.store().update_watch(id, &data, Utc::now()).await?)
}

/// Set only the selling price; a non-negative number or numeric string
pub async fn update_price(state: &AppState, id: i64, body: PriceUpdate) -> ServiceResult<Watch> {
    let price = parse_price(&body.price).ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidPrice, "Price must be a non-negative number")
    })?;
    let data = WatchUpdate {
        selling_price: Some(price),
        ..Default::default()
    };
    Ok(state.store().update_watch(id, &data, Utc::now()).await?)
}

fn parse_price(value: &Value) -> Option<Decimal> {
    let price = json_decimal(value)?;
    (!price.is_sign_negative() || price.is_zero()).then_some(price)
}

/// Refused while sales reference the watch; drops its price log
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    state.store().delete_watch(id).await?;
    tracing::info!(watch_id = id, "Watch deleted");
    Ok(())
}

/// Copy a watch under a new `-D` code, unsold and added now
pub async fn duplicate(state: &AppState, id: i64) -> ServiceResult<Watch> {
    let source = get(state, id).await?;
    let data = WatchCreate {
        brand: source.brand,
        model: source.model,
        reference: source.reference,
        serial_number: source.serial_number,
        year: source.year,
        condition: source.condition,
        case_material: source.case_material,
        bracelet_material: source.bracelet_material,
        case_size: source.case_size,
        dial_color: source.dial_color,
        movement: source.movement,
        purchase_date: source.purchase_date,
        purchase_price: source.purchase_price,
        selling_price: source.selling_price,
        accessories: source.accessories,
        product_code: None,
        supplier_id: source.supplier_id,
    };
    let copy = insert_generated(state, data, Some("-D")).await?;
    tracing::info!(source_id = id, watch_id = copy.id, "Watch duplicated");
    Ok(copy)
}

pub async fn price_history(state: &AppState, id: i64) -> ServiceResult<Vec<PriceHistory>> {
    get(state, id).await?;
    Ok(state.store().price_history(id).await?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    pub(crate) fn submariner() -> WatchCreate {
        WatchCreate {
            brand: "Rolex".into(),
            model: "Submariner".into(),
            reference: "126610LN".into(),
            serial_number: None,
            year: Some(2021),
            condition: "Ottimo".into(),
            case_material: "Acciaio".into(),
            bracelet_material: "Oyster".into(),
            case_size: 41,
            dial_color: "Nero".into(),
            movement: "Automatico".into(),
            purchase_date: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            purchase_price: Decimal::from(9000),
            selling_price: Decimal::from(11500),
            accessories: "Box e garanzia".into(),
            product_code: None,
            supplier_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_generates_code_and_history() {
        let state = AppState::in_memory();
        let watch = create(&state, submariner()).await.unwrap();
        assert!(watch.product_code.starts_with("ROL-"));
        assert!(!watch.is_sold);

        let history = price_history(&state, watch.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, Decimal::from(11500));
    }

    #[tokio::test]
    async fn test_case_size_minimum() {
        let state = AppState::in_memory();
        let mut data = submariner();
        data.case_size = 19;
        let err: AppError = create(&state, data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_price_changes_are_logged() {
        let state = AppState::in_memory();
        let watch = create(&state, submariner()).await.unwrap();

        // Same price: no new entry
        let same = WatchUpdate {
            selling_price: Some(Decimal::from(11500)),
            ..Default::default()
        };
        update(&state, watch.id, same).await.unwrap();
        assert_eq!(price_history(&state, watch.id).await.unwrap().len(), 1);

        let updated = update_price(&state, watch.id, PriceUpdate { price: json!("10.900,00") })
            .await
            .unwrap();
        assert_eq!(updated.selling_price, Decimal::from(10900));
        assert_eq!(price_history(&state, watch.id).await.unwrap().len(), 2);

        let err: AppError = update_price(&state, watch.id, PriceUpdate { price: json!(-5) })
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
    }

    #[tokio::test]
    async fn test_duplicate() {
        let state = AppState::in_memory();
        let watch = create(&state, submariner()).await.unwrap();
        let copy = duplicate(&state, watch.id).await.unwrap();

        assert_ne!(copy.id, watch.id);
        assert!(copy.product_code.ends_with("-D"));
        assert_eq!(copy.reference, watch.reference);
        assert_eq!(price_history(&state, copy.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_supplier() {
        let state = AppState::in_memory();
        let mut data = submariner();
        data.supplier_id = Some(99);
        let err: AppError = create(&state, data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::SupplierNotFound);
    }
}
