//! Customer Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Running total of all sale prices paid by this customer
    pub total_spent: Decimal,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreate {
    #[validate(length(min = 1, max = 200, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 200, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,
    #[validate(custom(function = "super::validate::email_or_blank"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
}

/// Update customer payload (every field optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[validate(length(min = 1, max = 200, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Address must not be empty"))]
    pub address: Option<String>,
    #[validate(custom(function = "super::validate::email_or_blank"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
}
