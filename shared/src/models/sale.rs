//! Sale Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::coerce::de;

/// Sale of a watch to a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub customer_id: i64,
    pub watch_id: i64,
    pub sale_date: DateTime<Utc>,
    pub sale_price: Decimal,
}

/// Create sale payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreate {
    pub customer_id: i64,
    pub watch_id: i64,
    /// Defaults to now
    #[serde(default, deserialize_with = "de::datetime_opt")]
    pub sale_date: Option<DateTime<Utc>>,
    #[validate(custom(function = "super::validate::non_negative"))]
    pub sale_price: Decimal,
}
