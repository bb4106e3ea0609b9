//! Product Model
//!
//! A product belongs to one category for its whole life. Its variable
//! attributes live in [`ProductFieldValue`] rows keyed by field id.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::{Category, CategoryField};
use crate::coerce::de;

/// Product entity (core columns only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub product_code: String,
    pub name: String,
    pub description: Option<String>,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub condition: String,
    pub is_sold: bool,
    pub supplier_id: Option<i64>,
    pub added_at: DateTime<Utc>,
    pub updated_at: i64,
}

/// Stored custom field value; text regardless of the field type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductFieldValue {
    pub id: i64,
    pub product_id: i64,
    pub field_id: i64,
    pub value: String,
}

/// Core attributes shared by create and (merged) update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCore {
    #[validate(
        length(max = 200),
        custom(function = "super::validate::not_blank", message = "Name is required")
    )]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub purchase_price: Decimal,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub selling_price: Decimal,
    #[serde(deserialize_with = "de::datetime")]
    pub purchase_date: DateTime<Utc>,
    #[validate(custom(function = "super::validate::not_blank", message = "Condition is required"))]
    pub condition: String,
    pub supplier_id: Option<i64>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub category_id: i64,
    #[serde(flatten)]
    pub core: ProductCore,
    /// Custom field values keyed by field slug
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
}

/// Update product payload; omitted attributes keep their stored value and
/// an explicit `null` clears `description` or `supplierId`.
/// A `categoryId` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub purchase_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::datetime_opt")]
    pub purchase_date: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier_id: Option<Option<i64>>,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
}

impl ProductUpdate {
    /// Merge the supplied attributes over the stored product
    pub fn merge_core(&self, product: &Product) -> ProductCore {
        ProductCore {
            name: self.name.clone().unwrap_or_else(|| product.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| product.description.clone()),
            purchase_price: self.purchase_price.unwrap_or(product.purchase_price),
            selling_price: self.selling_price.unwrap_or(product.selling_price),
            purchase_date: self.purchase_date.unwrap_or(product.purchase_date),
            condition: self
                .condition
                .clone()
                .unwrap_or_else(|| product.condition.clone()),
            supplier_id: self.supplier_id.unwrap_or(product.supplier_id),
        }
    }
}

/// `PATCH /api/products/:id/sold` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSell {
    pub customer_id: Option<i64>,
    pub sale_price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::datetime_opt")]
    pub sale_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Sale of a product to a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductSale {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
    pub notes: String,
}

/// Product list filters (`GET /api/products?categoryId=&sold=`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub sold: Option<bool>,
}

/// Product merged with its custom fields, category and field definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    /// Typed values keyed by field slug
    pub custom_fields: Map<String, Value>,
    pub category: Category,
    pub field_definitions: Vec<CategoryField>,
}
