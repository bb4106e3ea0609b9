//! Category Field Model
//!
//! Administrator-defined attribute of a category. Values are stored per
//! product as text and interpreted through the declared [`FieldType`].

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Declared type of a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Textarea,
    Boolean,
}

impl FieldType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "textarea" => Ok(Self::Textarea),
            "boolean" => Ok(Self::Boolean),
            other => Err(format!("unknown field type: {other}")),
        }
    }
}

/// Field definition entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CategoryField {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    /// Derived from the name, unique within the category
    pub slug: String,
    pub label: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub field_type: FieldType,
    pub is_required: bool,
    /// Comma-separated option list, only meaningful for select fields
    pub options: Option<String>,
    pub display_order: i32,
    pub show_in_table: bool,
    pub show_in_graph: bool,
}

impl CategoryField {
    /// Parsed option list (trimmed, blanks dropped)
    pub fn option_list(&self) -> Vec<String> {
        split_options(self.options.as_deref())
    }
}

/// Split a comma-separated option string
pub fn split_options(options: Option<&str>) -> Vec<String> {
    options
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create field payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FieldCreate {
    #[validate(
        length(max = 200),
        custom(function = "super::validate::not_blank", message = "Name is required")
    )]
    pub name: String,
    /// Defaults to the name when blank
    #[serde(default)]
    #[validate(length(max = 200))]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    pub options: Option<String>,
    /// Appended after the last field when absent
    pub display_order: Option<i32>,
    #[serde(default)]
    pub show_in_table: bool,
    #[serde(default)]
    pub show_in_graph: bool,
}

/// Update field payload; omitted attributes keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    #[validate(
        length(max = 200),
        custom(function = "super::validate::not_blank", message = "Name must not be empty")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub is_required: Option<bool>,
    pub options: Option<String>,
    pub display_order: Option<i32>,
    pub show_in_table: Option<bool>,
    pub show_in_graph: Option<bool>,
}

/// `PUT /api/product-categories/:id/fields/reorder` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReorder {
    pub field_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_serde() {
        let json = serde_json::to_string(&FieldType::Textarea).unwrap();
        assert_eq!(json, "\"textarea\"");
        let parsed: FieldType = serde_json::from_str("\"boolean\"").unwrap();
        assert_eq!(parsed, FieldType::Boolean);
        assert!(FieldType::try_from("color".to_string()).is_err());
    }

    #[test]
    fn test_split_options() {
        assert_eq!(
            split_options(Some("Nero, Blu ,,Verde ")),
            vec!["Nero", "Blu", "Verde"]
        );
        assert!(split_options(None).is_empty());
    }

    #[test]
    fn test_field_create_uses_type_key() {
        let body = r#"{"name":"colore","label":"Colore","type":"text","isRequired":true}"#;
        let payload: FieldCreate = serde_json::from_str(body).unwrap();
        assert_eq!(payload.field_type, FieldType::Text);
        assert!(payload.is_required);
        assert!(payload.display_order.is_none());
    }
}
