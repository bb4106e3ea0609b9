//! Product Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::CategoryField;

/// Product category; owns an ordered set of field definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// URL-safe identifier derived from the name, unique across categories
    pub slug: String,
    /// Icon tag rendered by the client (e.g. "Watch")
    pub icon: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/update category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[validate(
        length(max = 200),
        custom(function = "super::validate::not_blank", message = "Name is required")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub icon: String,
}

/// Category together with its field definitions ordered by display order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithFields {
    #[serde(flatten)]
    pub category: Category,
    pub fields: Vec<CategoryField>,
}
