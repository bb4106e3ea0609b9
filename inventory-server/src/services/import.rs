//! Bulk import
//!
//! Rows arrive as loosely typed spreadsheet objects. Each row is projected
//! through the column mapping, coerced per target field, deserialized into
//! the regular create payload and handed to the same service function the
//! live endpoints use. A failing row is recorded and the batch continues.

use std::collections::HashMap;
use std::future::Future;

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::coerce::{de, json_decimal, parse_date};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryField, CustomerCreate, ImportRequest, ImportResult, ImportRow,
    ProductCore, ProductImportRequest, ProductSell, SaleCreate, SupplierCreate, WatchCreate,
};

use super::{catalog, customers, products, sales, suppliers, watches};
use crate::core::AppState;
use crate::error::{ServiceError, ServiceResult};
use crate::utils::require;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Decimal,
    Date,
    Int,
}

const CUSTOMER_COLUMNS: &[(&str, Kind)] = &[
    ("firstName", Kind::Text),
    ("lastName", Kind::Text),
    ("address", Kind::Text),
    ("email", Kind::Text),
    ("phone", Kind::Text),
];

const SUPPLIER_COLUMNS: &[(&str, Kind)] = &[
    ("name", Kind::Text),
    ("surname", Kind::Text),
    ("document", Kind::Text),
    ("phone", Kind::Text),
    ("email", Kind::Text),
    ("notes", Kind::Text),
];

const WATCH_COLUMNS: &[(&str, Kind)] = &[
    ("brand", Kind::Text),
    ("model", Kind::Text),
    ("reference", Kind::Text),
    ("serialNumber", Kind::Text),
    ("year", Kind::Int),
    ("condition", Kind::Text),
    ("caseMaterial", Kind::Text),
    ("braceletMaterial", Kind::Text),
    ("caseSize", Kind::Int),
    ("dialColor", Kind::Text),
    ("movement", Kind::Text),
    ("purchaseDate", Kind::Date),
    ("purchasePrice", Kind::Decimal),
    ("sellingPrice", Kind::Decimal),
    ("accessories", Kind::Text),
    ("productCode", Kind::Text),
    ("supplierId", Kind::Int),
];

const SALE_COLUMNS: &[(&str, Kind)] = &[
    ("customerId", Kind::Int),
    ("watchId", Kind::Int),
    ("productId", Kind::Int),
    ("saleDate", Kind::Date),
    ("salePrice", Kind::Decimal),
    ("notes", Kind::Text),
];

const PRODUCT_COLUMNS: &[(&str, Kind)] = &[
    ("name", Kind::Text),
    ("description", Kind::Text),
    ("purchasePrice", Kind::Decimal),
    ("sellingPrice", Kind::Decimal),
    ("purchaseDate", Kind::Date),
    ("condition", Kind::Text),
    ("supplierId", Kind::Int),
];

const DEFAULT_CONDITION: &str = "Nuovo";

/// A sale row targets either a watch or a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaleRow {
    customer_id: i64,
    watch_id: Option<i64>,
    product_id: Option<i64>,
    #[serde(default, deserialize_with = "de::datetime_opt")]
    sale_date: Option<chrono::DateTime<Utc>>,
    sale_price: Decimal,
    notes: Option<String>,
}

fn rows(data: &Value) -> Result<&Vec<Value>, AppError> {
    data.as_array().ok_or_else(|| {
        AppError::with_message(ErrorCode::ImportInvalidPayload, "data must be an array of rows")
    })
}

/// Apply `target → source` mappings; without mappings the row keys are
/// already target names
fn project(row: &ImportRow, mappings: Option<&HashMap<String, String>>) -> ImportRow {
    match mappings {
        None => row.clone(),
        Some(mappings) => mappings
            .iter()
            .filter(|(_, source)| !source.trim().is_empty())
            .filter_map(|(target, source)| {
                row.get(source).map(|value| (target.clone(), value.clone()))
            })
            .collect(),
    }
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Coerce the known columns and drop blanks; other keys pass through
fn coerce(row: ImportRow, columns: &[(&str, Kind)]) -> Result<ImportRow, AppError> {
    let mut out = Map::new();
    for (key, value) in row {
        let Some(text) = as_text(&value) else {
            continue;
        };
        let kind = columns.iter().find(|(name, _)| *name == key).map(|(_, k)| *k);
        let coerced = match kind {
            None => value,
            Some(Kind::Text) => Value::String(text),
            Some(Kind::Decimal) => json_decimal(&value)
                .map(|d| Value::String(d.normalize().to_string()))
                .ok_or_else(|| invalid(&key, &text, "a number"))?,
            Some(Kind::Date) => parse_date(&text)
                .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::Secs, true)))
                .ok_or_else(|| invalid(&key, &text, "a date"))?,
            Some(Kind::Int) => json_decimal(&value)
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_i64())
                .map(Value::from)
                .ok_or_else(|| invalid(&key, &text, "an integer"))?,
        };
        out.insert(key, coerced);
    }
    Ok(out)
}

fn invalid(key: &str, text: &str, expected: &str) -> AppError {
    AppError::validation(format!("{key} must be {expected} (got '{text}')"))
        .with_detail("field", key)
}

fn decode<T: DeserializeOwned>(row: ImportRow) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| AppError::validation(format!("Invalid row: {e}")))
}

fn row_message(err: ServiceError) -> String {
    AppError::from(err).message
}

/// Drive one import: decode every row and hand it to `create`
async fn run<T, F, Fut>(
    request: ImportRequest,
    columns: &[(&str, Kind)],
    mut create: F,
) -> ServiceResult<ImportResult>
where
    T: DeserializeOwned,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ServiceResult<()>>,
{
    let data = rows(&request.data)?;
    let mut result = ImportResult::new(data.len());

    for (i, raw) in data.iter().enumerate() {
        let outcome = match raw.as_object() {
            None => Err(AppError::validation("Row is not an object").into()),
            Some(row) => {
                let projected = project(row, request.mappings.as_ref());
                match coerce(projected, columns).and_then(decode::<T>) {
                    Ok(payload) => create(payload).await,
                    Err(e) => Err(e.into()),
                }
            }
        };
        match outcome {
            Ok(()) => result.success += 1,
            Err(e) => result.fail(i, row_message(e)),
        }
    }

    Ok(result)
}

fn log_result(entity: &str, result: &ImportResult) {
    tracing::info!(
        entity,
        total = result.total,
        success = result.success,
        failed = result.errors.len(),
        "Import finished"
    );
}

pub async fn import_customers(
    state: &AppState,
    request: ImportRequest,
) -> ServiceResult<ImportResult> {
    let result = run(request, CUSTOMER_COLUMNS, |data: CustomerCreate| async move {
        customers::create(state, data).await.map(|_| ())
    })
    .await?;
    log_result("customers", &result);
    Ok(result)
}

pub async fn import_suppliers(
    state: &AppState,
    request: ImportRequest,
) -> ServiceResult<ImportResult> {
    let result = run(request, SUPPLIER_COLUMNS, |data: SupplierCreate| async move {
        suppliers::create(state, data).await.map(|_| ())
    })
    .await?;
    log_result("suppliers", &result);
    Ok(result)
}

pub async fn import_watches(
    state: &AppState,
    request: ImportRequest,
) -> ServiceResult<ImportResult> {
    let result = run(request, WATCH_COLUMNS, |data: WatchCreate| async move {
        watches::create(state, data).await.map(|_| ())
    })
    .await?;
    log_result("watches", &result);
    Ok(result)
}

/// Sales go through the live sale paths, so totals and sold flags move
/// with each accepted row
pub async fn import_sales(state: &AppState, request: ImportRequest) -> ServiceResult<ImportResult> {
    let result = run(request, SALE_COLUMNS, |row: SaleRow| async move {
        match (row.watch_id, row.product_id) {
            (Some(watch_id), _) => {
                let sale = SaleCreate {
                    customer_id: row.customer_id,
                    watch_id,
                    sale_date: row.sale_date,
                    sale_price: row.sale_price,
                };
                sales::create(state, sale).await.map(|_| ())
            }
            (None, Some(product_id)) => {
                let body = ProductSell {
                    customer_id: Some(row.customer_id),
                    sale_price: Some(row.sale_price),
                    sale_date: row.sale_date,
                    notes: row.notes,
                };
                products::sell(state, product_id, body).await.map(|_| ())
            }
            (None, None) => Err(AppError::validation("watchId or productId is required").into()),
        }
    })
    .await?;
    log_result("sales", &result);
    Ok(result)
}

/// Core columns with their defaults plus custom values keyed by slug
fn product_row(
    row: ImportRow,
    fields: &[CategoryField],
) -> Result<(ProductCore, Map<String, Value>), AppError> {
    let mut custom = Map::new();
    let mut core = Map::new();
    for (key, value) in row {
        if PRODUCT_COLUMNS.iter().any(|(name, _)| *name == key) {
            core.insert(key, value);
        } else if fields.iter().any(|f| f.slug == key) {
            custom.insert(key, value);
        }
    }

    let mut core = coerce(core, PRODUCT_COLUMNS)?;
    if !core.contains_key("name") {
        return Err(AppError::validation("Name is required").with_detail("field", "name"));
    }
    core.entry("purchasePrice").or_insert_with(|| Value::from("0"));
    core.entry("sellingPrice").or_insert_with(|| Value::from("0"));
    core.entry("purchaseDate").or_insert_with(|| {
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    });
    core.entry("condition").or_insert_with(|| Value::from(DEFAULT_CONDITION));

    Ok((decode(core)?, custom))
}

async fn import_product_row(
    state: &AppState,
    category: &Category,
    fields: &[CategoryField],
    row: ImportRow,
    index: usize,
) -> ServiceResult<()> {
    let (core, custom) = product_row(row, fields)?;
    let suffix = format!("-{index}");
    products::insert(state, category, fields, core, &custom, Some(&suffix)).await?;
    Ok(())
}

pub async fn import_products(
    state: &AppState,
    request: ProductImportRequest,
) -> ServiceResult<ImportResult> {
    let category_id = require(request.category_id, "categoryId")?;
    let data = rows(&request.data)?;
    let category = catalog::find_category(state, category_id).await?;
    let fields = state.store().list_fields(category.id).await?;

    let mut result = ImportResult::new(data.len());
    for (i, raw) in data.iter().enumerate() {
        let outcome = match raw.as_object() {
            None => Err(AppError::validation("Row is not an object").into()),
            Some(row) => {
                let projected = project(row, request.mappings.as_ref());
                import_product_row(state, &category, &fields, projected, i).await
            }
        };
        match outcome {
            Ok(()) => result.success += 1,
            Err(e) => result.fail(i, row_message(e)),
        }
    }

    tracing::info!(
        category_id,
        total = result.total,
        success = result.success,
        failed = result.errors.len(),
        "Product import finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::products::tests::orologi;
    use serde_json::json;
    use shared::models::ProductFilter;

    fn request(data: Value) -> ImportRequest {
        ImportRequest { mappings: None, data }
    }

    fn mapped(pairs: &[(&str, &str)], data: Value) -> ImportRequest {
        let mappings = pairs
            .iter()
            .map(|(t, s)| (t.to_string(), s.to_string()))
            .collect();
        ImportRequest {
            mappings: Some(mappings),
            data,
        }
    }

    #[test]
    fn test_project_skips_empty_sources() {
        let row = json!({ "Nome": "Marco", "Cognome": "Rossi" });
        let mappings: HashMap<String, String> = [
            ("firstName".to_string(), "Nome".to_string()),
            ("lastName".to_string(), "".to_string()),
        ]
        .into_iter()
        .collect();
        let projected = project(row.as_object().unwrap(), Some(&mappings));
        assert_eq!(projected.len(), 1);
        assert_eq!(projected["firstName"], json!("Marco"));
    }

    #[test]
    fn test_coerce_by_kind() {
        let row = json!({
            "purchasePrice": "€ 1.250,00",
            "purchaseDate": "15/03/2024",
            "caseSize": "41",
            "brand": "  Omega ",
            "serialNumber": "",
        });
        let out = coerce(row.as_object().cloned().unwrap(), WATCH_COLUMNS).unwrap();
        assert_eq!(out["purchasePrice"], json!("1250"));
        assert_eq!(out["purchaseDate"], json!("2024-03-15T00:00:00Z"));
        assert_eq!(out["caseSize"], json!(41));
        assert_eq!(out["brand"], json!("Omega"));
        assert!(!out.contains_key("serialNumber"));

        let bad = json!({ "purchasePrice": "n/d" });
        assert!(coerce(bad.as_object().cloned().unwrap(), WATCH_COLUMNS).is_err());
    }

    #[tokio::test]
    async fn test_import_customers_partial_success() {
        let state = AppState::in_memory();
        let data = json!([
            { "Nome": "Marco", "Cognome": "Rossi", "Indirizzo": "Via Roma 1" },
            { "Nome": "Luca", "Cognome": "", "Indirizzo": "Via Milano 2" },
            {
                "Nome": "Sara",
                "Cognome": "Verdi",
                "Indirizzo": "Via Torino 3",
                "Mail": "sara@example.com"
            },
        ]);
        let req = mapped(
            &[
                ("firstName", "Nome"),
                ("lastName", "Cognome"),
                ("address", "Indirizzo"),
                ("email", "Mail"),
            ],
            data,
        );

        let result = import_customers(&state, req).await.unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.success, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 2);
        assert_eq!(customers::list(&state).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_import_rejects_non_array() {
        let state = AppState::in_memory();
        let err = AppError::from(
            import_suppliers(&state, request(json!({ "name": "x" })))
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::ImportInvalidPayload);
    }

    #[tokio::test]
    async fn test_import_watches_generates_codes() {
        let state = AppState::in_memory();
        let data = json!([{
            "brand": "Omega",
            "reference": "310.30.42",
            "caseMaterial": "Acciaio",
            "braceletMaterial": "Acciaio",
            "caseSize": "42",
            "dialColor": "Nero",
            "purchaseDate": "2024-02-01",
            "purchasePrice": "4.500,00",
            "sellingPrice": "5.900,00",
        }]);
        let result = import_watches(&state, request(data)).await.unwrap();
        assert_eq!(result.success, 1, "{:?}", result.errors);

        let all = watches::list(&state).await.unwrap();
        assert!(all[0].product_code.starts_with("OME-"));
        assert_eq!(all[0].purchase_price, Decimal::from(4500));
        assert_eq!(all[0].selling_price, Decimal::from(5900));
        assert_eq!(watches::price_history(&state, all[0].id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_sales_mirrors_live_path() {
        let state = AppState::in_memory();
        let customer = customers::create(
            &state,
            CustomerCreate {
                first_name: "Paolo".into(),
                last_name: "Gialli".into(),
                address: "Via Verdi 9".into(),
                email: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        let watch = watches::create(&state, watches::tests::submariner()).await.unwrap();

        let data = json!([
            {
                "customerId": customer.id.to_string(),
                "watchId": watch.id,
                "salePrice": "12.000,00"
            },
            { "customerId": customer.id, "watchId": watch.id, "salePrice": "12000" },
            { "customerId": customer.id, "salePrice": "100" },
        ]);
        let result = import_sales(&state, request(data)).await.unwrap();
        assert_eq!(result.success, 1);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].row, 2);

        let customer = customers::get(&state, customer.id).await.unwrap();
        assert_eq!(customer.total_spent, Decimal::from(12000));
        assert!(watches::get(&state, watch.id).await.unwrap().is_sold);
    }

    #[tokio::test]
    async fn test_import_products() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;

        let data = json!([
            { "Nome": "Seamaster", "Colore": "Blu", "Prezzo": "3.200,00" },
            { "Nome": "", "Colore": "Nero" },
            { "Nome": "Daytona" },
        ]);
        let req = ProductImportRequest {
            category_id: Some(cat.id),
            mappings: Some(
                [("name", "Nome"), ("colore", "Colore"), ("sellingPrice", "Prezzo")]
                    .into_iter()
                    .map(|(t, s)| (t.to_string(), s.to_string()))
                    .collect(),
            ),
            data,
        };

        let result = import_products(&state, req).await.unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.success, 1);
        assert_eq!(result.errors[0].row, 2);
        assert_eq!(result.errors[0].message, "Name is required");
        assert_eq!(result.errors[1].row, 3);
        assert_eq!(result.errors[1].message, "Field Colore is required");

        let listed = products::list(&state, ProductFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        let product = &listed[0];
        assert_eq!(product.product.condition, "Nuovo");
        assert_eq!(product.product.selling_price, Decimal::from(3200));
        assert_eq!(product.product.purchase_price, Decimal::ZERO);
        assert!(product.product.product_code.ends_with("-0"));
        assert_eq!(product.custom_fields["colore"], json!("Blu"));
    }

    #[tokio::test]
    async fn test_import_products_keeps_json_number_precision() {
        let state = AppState::in_memory();
        let cat = orologi(&state).await;

        let data = json!([{
            "name": "Seiko",
            "colore": "Nero",
            "diametro": 40.125,
            "purchasePrice": 1.125,
            "sellingPrice": 12.345,
        }]);
        let req = ProductImportRequest {
            category_id: Some(cat.id),
            mappings: None,
            data,
        };
        let result = import_products(&state, req).await.unwrap();
        assert_eq!(result.success, 1, "{:?}", result.errors);

        let listed = products::list(&state, ProductFilter::default()).await.unwrap();
        let product = &listed[0];
        assert_eq!(product.product.purchase_price, Decimal::new(1125, 3));
        assert_eq!(product.product.selling_price, Decimal::new(12345, 3));
        assert_eq!(product.custom_fields["diametro"], json!(40.125));
    }

    #[test]
    fn test_coerce_integers_from_json_numbers() {
        let row = json!({ "caseSize": 42, "year": "2019" });
        let out = coerce(row.as_object().cloned().unwrap(), WATCH_COLUMNS).unwrap();
        assert_eq!(out["caseSize"], json!(42));

        let row = json!({ "customerId": 1.234, "watchId": 3 });
        assert!(coerce(row.as_object().cloned().unwrap(), SALE_COLUMNS).is_err());
    }

    #[tokio::test]
    async fn test_import_products_requires_category() {
        let state = AppState::in_memory();
        let missing = ProductImportRequest {
            category_id: None,
            mappings: None,
            data: json!([]),
        };
        let err = AppError::from(import_products(&state, missing).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let unknown = ProductImportRequest {
            category_id: Some(77),
            mappings: None,
            data: json!([]),
        };
        let err = AppError::from(import_products(&state, unknown).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::CategoryNotFound);
    }
}
