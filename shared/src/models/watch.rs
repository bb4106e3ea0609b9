//! Watch Model
//!
//! Fixed-schema inventory item with its own price log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::coerce::de;

/// Watch entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Watch {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub reference: String,
    pub serial_number: Option<String>,
    pub year: Option<i32>,
    pub condition: String,
    pub case_material: String,
    pub bracelet_material: String,
    /// Case diameter in millimetres
    pub case_size: i32,
    pub dial_color: String,
    pub movement: String,
    pub purchase_date: DateTime<Utc>,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub accessories: String,
    pub product_code: String,
    pub supplier_id: Option<i64>,
    pub is_sold: bool,
    pub added_at: DateTime<Utc>,
}

/// Create watch payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WatchCreate {
    #[validate(custom(function = "super::validate::not_blank", message = "Brand is required"))]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[validate(custom(function = "super::validate::not_blank", message = "Reference is required"))]
    pub reference: String,
    pub serial_number: Option<String>,
    #[validate(range(min = 1800, max = 2200))]
    pub year: Option<i32>,
    #[serde(default)]
    pub condition: String,
    #[validate(custom(
        function = "super::validate::not_blank",
        message = "Case material is required"
    ))]
    pub case_material: String,
    #[validate(custom(
        function = "super::validate::not_blank",
        message = "Bracelet material is required"
    ))]
    pub bracelet_material: String,
    #[validate(range(min = 20, message = "Case size must be at least 20mm"))]
    pub case_size: i32,
    #[validate(custom(function = "super::validate::not_blank", message = "Dial color is required"))]
    pub dial_color: String,
    #[serde(default)]
    pub movement: String,
    #[serde(deserialize_with = "de::datetime")]
    pub purchase_date: DateTime<Utc>,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub purchase_price: Decimal,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub selling_price: Decimal,
    #[serde(default)]
    pub accessories: String,
    /// Generated from the brand when absent
    pub product_code: Option<String>,
    pub supplier_id: Option<i64>,
}

/// Partial watch update (PUT and PATCH)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WatchUpdate {
    #[validate(custom(function = "super::validate::not_blank"))]
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(custom(function = "super::validate::not_blank"))]
    pub reference: Option<String>,
    pub serial_number: Option<String>,
    #[validate(range(min = 1800, max = 2200))]
    pub year: Option<i32>,
    pub condition: Option<String>,
    #[validate(custom(function = "super::validate::not_blank"))]
    pub case_material: Option<String>,
    #[validate(custom(function = "super::validate::not_blank"))]
    pub bracelet_material: Option<String>,
    #[validate(range(min = 20, message = "Case size must be at least 20mm"))]
    pub case_size: Option<i32>,
    #[validate(custom(function = "super::validate::not_blank"))]
    pub dial_color: Option<String>,
    pub movement: Option<String>,
    #[serde(default, deserialize_with = "de::datetime_opt")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub purchase_price: Option<Decimal>,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub selling_price: Option<Decimal>,
    pub accessories: Option<String>,
    pub supplier_id: Option<i64>,
}

impl WatchUpdate {
    /// Apply the supplied fields onto a stored watch
    pub fn apply_to(self, watch: &mut Watch) {
        if let Some(v) = self.brand {
            watch.brand = v;
        }
        if let Some(v) = self.model {
            watch.model = v;
        }
        if let Some(v) = self.reference {
            watch.reference = v;
        }
        if let Some(v) = self.serial_number {
            watch.serial_number = Some(v);
        }
        if let Some(v) = self.year {
            watch.year = Some(v);
        }
        if let Some(v) = self.condition {
            watch.condition = v;
        }
        if let Some(v) = self.case_material {
            watch.case_material = v;
        }
        if let Some(v) = self.bracelet_material {
            watch.bracelet_material = v;
        }
        if let Some(v) = self.case_size {
            watch.case_size = v;
        }
        if let Some(v) = self.dial_color {
            watch.dial_color = v;
        }
        if let Some(v) = self.movement {
            watch.movement = v;
        }
        if let Some(v) = self.purchase_date {
            watch.purchase_date = v;
        }
        if let Some(v) = self.purchase_price {
            watch.purchase_price = v;
        }
        if let Some(v) = self.selling_price {
            watch.selling_price = v;
        }
        if let Some(v) = self.accessories {
            watch.accessories = v;
        }
        if let Some(v) = self.supplier_id {
            watch.supplier_id = Some(v);
        }
    }
}

/// `PATCH /api/watches/:id/price` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub price: serde_json::Value,
}

/// Append-only log entry of a watch's selling price
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub id: i64,
    pub watch_id: i64,
    pub price: Decimal,
    pub change_date: DateTime<Utc>,
}
