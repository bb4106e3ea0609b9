//! Statistics payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `GET /api/products/stats` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatsQuery {
    pub category_id: Option<i64>,
    pub field: Option<String>,
    pub period: Option<String>,
}

/// Number of sold products carrying one value of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStat {
    pub value: String,
    pub count: u64,
}

/// Dashboard metric cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_customers: u64,
    pub total_watches: u64,
    pub sold_watches: u64,
    pub total_products: u64,
    pub sold_products: u64,
}
