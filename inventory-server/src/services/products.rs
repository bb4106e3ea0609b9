//! Product service
//!
//! Products carry fixed core attributes plus custom values keyed by the
//! field definitions of their category. Responses are always the assembled
//! [`ProductDetail`].

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryField, Product, ProductCore, ProductCreate, ProductDetail,
    ProductFieldValue, ProductFilter, ProductSale, ProductSell, ProductUpdate,
};
use shared::util::{now_millis, product_code};

use super::{catalog, not_found, suppliers, with_fresh_code};
use crate::core::AppState;
use crate::db::{FieldValueWrite, NewProduct, NewProductSale};
use crate::eav::FieldValue;
use crate::error::ServiceResult;
use crate::utils::{require, validate_payload};

/// Coerce the supplied custom values and enforce required fields.
///
/// `stored` holds the ids of fields that already have a value (updates);
/// it is `None` on create. A required field passes when it gets a
/// non-blank value now or already has one and is not being blanked.
/// Blanking an optional field on update clears it.
pub(crate) fn resolve_values(
    fields: &[CategoryField],
    input: &Map<String, Value>,
    stored: Option<&HashSet<i64>>,
) -> Result<Vec<FieldValueWrite>, AppError> {
    let mut writes = Vec::new();

    for field in fields {
        let supplied = input.get(&field.slug);
        let value = match supplied {
            Some(raw) => FieldValue::from_input(field, raw)?,
            None => None,
        };

        match value {
            Some(value) => writes.push((field.id, value.to_stored())),
            None => {
                let has_stored = stored.is_some_and(|s| s.contains(&field.id));
                let blanked = supplied.is_some();
                if field.is_required && (blanked || !has_stored) {
                    return Err(AppError::required_field(&field.label));
                }
                if blanked && has_stored {
                    writes.push((field.id, String::new()));
                }
            }
        }
    }

    Ok(writes)
}

/// Typed values keyed by slug; values of deleted fields and blanks are skipped
pub(crate) fn custom_fields_json(
    fields: &[CategoryField],
    values: &[ProductFieldValue],
) -> Map<String, Value> {
    let by_field: HashMap<i64, &str> = values
        .iter()
        .filter(|v| !v.value.is_empty())
        .map(|v| (v.field_id, v.value.as_str()))
        .collect();

    fields
        .iter()
        .filter_map(|field| {
            let raw = by_field.get(&field.id)?;
            let value = FieldValue::from_stored(field.field_type, raw);
            Some((field.slug.clone(), value.to_json()))
        })
        .collect()
}

fn stored_ids(values: &[ProductFieldValue]) -> HashSet<i64> {
    values
        .iter()
        .filter(|v| !v.value.is_empty())
        .map(|v| v.field_id)
        .collect()
}

pub async fn assemble(state: &AppState, product: Product) -> ServiceResult<ProductDetail> {
    let category = catalog::find_category(state, product.category_id).await?;
    let fields = state.store().list_fields(category.id).await?;
    let values = state.store().field_values(product.id).await?;
    Ok(ProductDetail {
        custom_fields: custom_fields_json(&fields, &values),
        product,
        category,
        field_definitions: fields,
    })
}

/// Assembled products, optionally filtered by category and sold state
pub async fn list(state: &AppState, filter: ProductFilter) -> ServiceResult<Vec<ProductDetail>> {
    let products = state.store().list_products(filter).await?;

    let mut catalogs: HashMap<i64, (Category, Vec<CategoryField>)> = HashMap::new();
    let mut details = Vec::with_capacity(products.len());

    for product in products {
        if !catalogs.contains_key(&product.category_id) {
            let category = catalog::find_category(state, product.category_id).await?;
            let fields = state.store().list_fields(category.id).await?;
            catalogs.insert(category.id, (category, fields));
        }
        let Some((category, fields)) = catalogs.get(&product.category_id) else {
            continue;
        };
        let values = state.store().field_values(product.id).await?;
        details.push(ProductDetail {
            custom_fields: custom_fields_json(fields, &values),
            product,
            category: category.clone(),
            field_definitions: fields.clone(),
        });
    }

    Ok(details)
}

pub async fn find(state: &AppState, id: i64) -> ServiceResult<Product> {
    state
        .store()
        .find_product(id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::ProductNotFound, "Product", id))
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<ProductDetail> {
    let product = find(state, id).await?;
    assemble(state, product).await
}

pub async fn create(state: &AppState, payload: ProductCreate) -> ServiceResult<ProductDetail> {
    let category = catalog::find_category(state, payload.category_id).await?;
    let fields = state.store().list_fields(category.id).await?;
    let product = insert(
        state,
        &category,
        &fields,
        payload.core,
        &payload.custom_fields,
        None,
    )
    .await?;
    assemble(state, product).await
}

/// Validate and insert one product of `category`; shared with bulk import
pub(crate) async fn insert(
    state: &AppState,
    category: &Category,
    fields: &[CategoryField],
    core: ProductCore,
    custom_fields: &Map<String, Value>,
    code_suffix: Option<&str>,
) -> ServiceResult<Product> {
    validate_payload(&core)?;
    suppliers::ensure_exists(state, core.supplier_id).await?;
    let values = resolve_values(fields, custom_fields, None)?;

    let store = state.store();
    let values = &values;
    let added_at = Utc::now();
    let product = with_fresh_code(
        state.config.product_code_attempts,
        || product_code(&category.name, code_suffix),
        |code| {
            let new = NewProduct {
                category_id: category.id,
                product_code: code,
                core: core.clone(),
                added_at,
                now: now_millis(),
            };
            async move { store.create_product(&new, values).await }
        },
    )
    .await?;

    tracing::info!(
        product_id = product.id,
        category_id = category.id,
        code = %product.product_code,
        "Product created"
    );
    Ok(product)
}

/// Merge the payload over the stored product; omitted custom values stay
pub async fn update(
    state: &AppState,
    id: i64,
    payload: ProductUpdate,
) -> ServiceResult<ProductDetail> {
    let existing = find(state, id).await?;
    let core = payload.merge_core(&existing);
    validate_payload(&core)?;
    suppliers::ensure_exists(state, core.supplier_id).await?;

    let fields = state.store().list_fields(existing.category_id).await?;
    let stored = stored_ids(&state.store().field_values(id).await?);
    let values = resolve_values(&fields, &payload.custom_fields, Some(&stored))?;

    let product = state
        .store()
        .update_product(id, &core, &values, now_millis())
        .await?;
    tracing::info!(product_id = id, values = values.len(), "Product updated");
    assemble(state, product).await
}

/// Refused while sales reference the product
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    state.store().delete_product(id).await?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(())
}

/// Sell a product to a customer
pub async fn sell(state: &AppState, id: i64, body: ProductSell) -> ServiceResult<ProductDetail> {
    let product = find(state, id).await?;
    if product.is_sold {
        return Err(AppError::with_message(
            ErrorCode::ProductAlreadySold,
            format!("Product {id} has already been sold"),
        )
        .into());
    }

    let customer_id = require(body.customer_id, "customerId")?;
    let sale_price = require(body.sale_price, "salePrice")?;
    if sale_price <= Decimal::ZERO {
        return Err(AppError::validation("salePrice must be greater than zero")
            .with_detail("field", "salePrice")
            .into());
    }

    let sale = NewProductSale {
        customer_id,
        sale_price,
        sale_date: body.sale_date.unwrap_or_else(Utc::now),
        notes: body.notes.unwrap_or_default(),
        now: now_millis(),
    };
    let product = state.store().sell_product(id, &sale).await?;
    tracing::info!(product_id = id, customer_id, "Product sold");
    assemble(state, product).await
}

pub async fn sales(state: &AppState, id: i64) -> ServiceResult<Vec<ProductSale>> {
    find(state, id).await?;
    Ok(state.store().product_sales(id).await?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::customers;
    use chrono::TimeZone;
    use serde_json::json;
    use shared::models::{CategoryInput, CustomerCreate, FieldCreate, FieldType};

    fn code_of(err: ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    pub(crate) fn core(name: &str) -> ProductCore {
        ProductCore {
            name: name.into(),
            description: None,
            purchase_price: Decimal::from(100),
            selling_price: Decimal::from(150),
            purchase_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            condition: "Nuovo".into(),
            supplier_id: None,
        }
    }

    pub(crate) fn field(name: &str, field_type: FieldType, required: bool) -> FieldCreate {
        FieldCreate {
            name: name.into(),
            label: String::new(),
            field_type,
            is_required: required,
            options: None,
            display_order: None,
            show_in_table: true,
            show_in_graph: true,
        }
    }

    /// "Orologi" with a required text field "colore" and a number field "diametro"
    pub(crate) async fn orologi(state: &AppState) -> Category {
        let category = catalog::create_category(
            state,
            CategoryInput {
                name: "Orologi".into(),
                icon: "Watch".into(),
            },
        )
        .await
        .unwrap();
        let mut colore = field("colore", FieldType::Text, true);
        colore.label = "Colore".into();
        catalog::create_field(state, category.id, colore).await.unwrap();
        catalog::create_field(state, category.id, field("diametro", FieldType::Number, false))
            .await
            .unwrap();
        category
    }

    fn create_payload(category_id: i64, custom: Value) -> ProductCreate {
        ProductCreate {
            category_id,
            core: core("Speedmaster"),
            custom_fields: custom.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn test_create_and_assemble() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;

        let detail = create(
            &state,
            create_payload(cat.id, json!({"colore": "Nero", "diametro": "42,5", "ignored": 1})),
        )
        .await
        .unwrap();

        assert!(detail.product.product_code.starts_with("ORO-"));
        assert_eq!(detail.custom_fields["colore"], json!("Nero"));
        assert_eq!(detail.custom_fields["diametro"], json!(42.5));
        assert!(!detail.custom_fields.contains_key("ignored"));
        assert_eq!(detail.category.id, cat.id);
        assert_eq!(detail.field_definitions.len(), 2);
        assert_eq!(detail.field_definitions[0].slug, "colore");
    }

    #[tokio::test]
    async fn test_required_field_names_label() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;

        for custom in [json!({}), json!({"colore": ""}), json!({"colore": null})] {
            let err = create(&state, create_payload(cat.id, custom)).await.unwrap_err();
            let err = AppError::from(err);
            assert_eq!(err.code, ErrorCode::RequiredFieldMissing);
            assert_eq!(err.message, "Field Colore is required");
        }
        assert!(list(&state, ProductFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_number_is_rejected() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;
        let err = create(
            &state,
            create_payload(cat.id, json!({"colore": "Nero", "diametro": "largo"})),
        )
        .await
        .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::FieldValueInvalid);
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_values() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;
        let created = create(
            &state,
            create_payload(cat.id, json!({"colore": "Nero", "diametro": 40})),
        )
        .await
        .unwrap();
        let id = created.product.id;

        let body: ProductUpdate = serde_json::from_value(json!({
            "categoryId": 999,
            "sellingPrice": "175.00",
            "customFields": {"diametro": 41}
        }))
        .unwrap();
        let updated = update(&state, id, body).await.unwrap();
        assert_eq!(updated.product.category_id, cat.id);
        assert_eq!(updated.product.selling_price, Decimal::from(175));
        assert_eq!(updated.custom_fields["colore"], json!("Nero"));
        assert_eq!(updated.custom_fields["diametro"], json!(41));

        // Blanking a required field fails, blanking an optional one clears it
        let body: ProductUpdate =
            serde_json::from_value(json!({"customFields": {"colore": ""}})).unwrap();
        let err = update(&state, id, body).await.unwrap_err();
        assert_eq!(code_of(err), ErrorCode::RequiredFieldMissing);

        let body: ProductUpdate =
            serde_json::from_value(json!({"customFields": {"diametro": ""}})).unwrap();
        let updated = update(&state, id, body).await.unwrap();
        assert!(!updated.custom_fields.contains_key("diametro"));
    }

    #[tokio::test]
    async fn test_update_clears_supplier_only_on_null() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;
        let supplier = suppliers::create(
            &state,
            serde_json::from_value(json!({"name": "Ditta Bianchi"})).unwrap(),
        )
        .await
        .unwrap();
        let mut payload = create_payload(cat.id, json!({"colore": "Nero"}));
        payload.core.supplier_id = Some(supplier.id);
        payload.core.description = Some("Scatola e garanzia".into());
        let id = create(&state, payload).await.unwrap().product.id;

        let body: ProductUpdate = serde_json::from_value(json!({"name": "Speedy"})).unwrap();
        let updated = update(&state, id, body).await.unwrap();
        assert_eq!(updated.product.supplier_id, Some(supplier.id));
        assert_eq!(updated.product.description.as_deref(), Some("Scatola e garanzia"));

        let body: ProductUpdate =
            serde_json::from_value(json!({"supplierId": null, "description": null})).unwrap();
        let updated = update(&state, id, body).await.unwrap();
        assert_eq!(updated.product.supplier_id, None);
        assert_eq!(updated.product.description, None);

        let body: ProductUpdate = serde_json::from_value(json!({"supplierId": 404})).unwrap();
        let err = update(&state, id, body).await.unwrap_err();
        assert_eq!(code_of(err), ErrorCode::SupplierNotFound);
    }

    #[tokio::test]
    async fn test_sell_flow() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;
        let product = create(&state, create_payload(cat.id, json!({"colore": "Nero"})))
            .await
            .unwrap()
            .product;
        let customer = customers::create(
            &state,
            CustomerCreate {
                first_name: "Luca".into(),
                last_name: "Verdi".into(),
                address: "Piazza Duomo 2".into(),
                email: None,
                phone: None,
            },
        )
        .await
        .unwrap();

        let missing_price = ProductSell {
            customer_id: Some(customer.id),
            ..Default::default()
        };
        let err = sell(&state, product.id, missing_price).await.unwrap_err();
        assert_eq!(code_of(err), ErrorCode::ValidationFailed);

        let body = ProductSell {
            customer_id: Some(customer.id),
            sale_price: Some(Decimal::from(180)),
            sale_date: None,
            notes: Some("Pagamento con bonifico".into()),
        };
        let sold = sell(&state, product.id, body.clone()).await.unwrap();
        assert!(sold.product.is_sold);

        let err = sell(&state, product.id, body).await.unwrap_err();
        assert_eq!(code_of(err), ErrorCode::ProductAlreadySold);

        let sales_log = sales(&state, product.id).await.unwrap();
        assert_eq!(sales_log.len(), 1);
        assert_eq!(sales_log[0].notes, "Pagamento con bonifico");
        let customer = customers::get(&state, customer.id).await.unwrap();
        assert_eq!(customer.total_spent, Decimal::from(180));

        let err = delete(&state, product.id).await.unwrap_err();
        assert_eq!(code_of(err), ErrorCode::ProductHasSales);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;
        create(&state, create_payload(cat.id, json!({"colore": "Nero"})))
            .await
            .unwrap();

        let by_cat = ProductFilter {
            category_id: Some(cat.id),
            sold: None,
        };
        assert_eq!(list(&state, by_cat).await.unwrap().len(), 1);

        let sold_only = ProductFilter {
            category_id: None,
            sold: Some(true),
        };
        assert!(list(&state, sold_only).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_field_values_disappear() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;
        let detail = create(
            &state,
            create_payload(cat.id, json!({"colore": "Nero", "diametro": 40})),
        )
        .await
        .unwrap();
        let diametro = detail
            .field_definitions
            .iter()
            .find(|f| f.slug == "diametro")
            .unwrap()
            .id;

        catalog::delete_field(&state, diametro).await.unwrap();
        let detail = get(&state, detail.product.id).await.unwrap();
        assert!(!detail.custom_fields.contains_key("diametro"));
        assert_eq!(detail.field_definitions.len(), 1);
    }
}
