//! Supplier Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supplier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub surname: String,
    /// Identity document number
    pub document: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

/// Create supplier payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierCreate {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub surname: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub document: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub phone: String,
    #[serde(default)]
    #[validate(custom(function = "super::validate::email_or_blank"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
}
