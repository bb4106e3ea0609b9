//! Typed custom field values
//!
//! Values are stored as text. This module is the only place where text is
//! turned into typed values and back, both for client input and for the
//! rows read from the value table.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::CategoryField;

use shared::coerce::json_decimal;
pub use shared::coerce::{parse_bool, parse_date, parse_decimal};
pub use shared::models::FieldType;

/// A custom field value interpreted through its field's declared type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Date(DateTime<Utc>),
    Boolean(bool),
    Select(String),
}

fn invalid(field: &CategoryField, expected: &str) -> AppError {
    AppError::with_message(
        ErrorCode::FieldValueInvalid,
        format!("Field {} must be {expected}", field.label),
    )
    .with_detail("field", field.slug.clone())
}

impl FieldValue {
    /// Coerce client input for `field`.
    ///
    /// `null` and blank strings mean "no value" and yield `Ok(None)`.
    pub fn from_input(field: &CategoryField, input: &Value) -> Result<Option<Self>, AppError> {
        let text = match input {
            Value::Null => return Ok(None),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => Some(s.trim()),
            _ => None,
        };

        let value = match field.field_type {
            FieldType::Text | FieldType::Textarea => match input {
                Value::String(s) => FieldValue::Text(s.clone()),
                Value::Number(n) => FieldValue::Text(n.to_string()),
                Value::Bool(b) => FieldValue::Text(b.to_string()),
                _ => return Err(invalid(field, "text")),
            },
            FieldType::Number => {
                let parsed = json_decimal(input).ok_or_else(|| invalid(field, "a number"))?;
                FieldValue::Number(parsed)
            }
            FieldType::Date => {
                let parsed = text.and_then(parse_date);
                FieldValue::Date(parsed.ok_or_else(|| invalid(field, "a valid date"))?)
            }
            FieldType::Boolean => {
                let parsed = match input {
                    Value::Bool(b) => Some(*b),
                    Value::Number(n) => match n.as_i64() {
                        Some(0) => Some(false),
                        Some(1) => Some(true),
                        _ => None,
                    },
                    _ => text.and_then(parse_bool),
                };
                FieldValue::Boolean(parsed.ok_or_else(|| invalid(field, "true or false"))?)
            }
            FieldType::Select => {
                let choice = match input {
                    Value::Number(n) => n.to_string(),
                    _ => text.ok_or_else(|| invalid(field, "one of its options"))?.to_string(),
                };
                let options = field.option_list();
                if !options.is_empty() && !options.contains(&choice) {
                    return Err(invalid(
                        field,
                        &format!("one of: {}", options.join(", ")),
                    ));
                }
                FieldValue::Select(choice)
            }
        };

        Ok(Some(value))
    }

    /// Parse a stored value. Text that no longer fits the declared type
    /// (the field changed type after it was written) comes back as `Text`.
    pub fn from_stored(field_type: FieldType, raw: &str) -> Self {
        let parsed = match field_type {
            FieldType::Text | FieldType::Textarea => None,
            FieldType::Number => parse_decimal(raw).map(FieldValue::Number),
            FieldType::Date => parse_date(raw).map(FieldValue::Date),
            FieldType::Boolean => parse_bool(raw).map(FieldValue::Boolean),
            FieldType::Select => Some(FieldValue::Select(raw.to_string())),
        };
        parsed.unwrap_or_else(|| FieldValue::Text(raw.to_string()))
    }

    /// Canonical text written to the value table
    pub fn to_stored(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Select(s) => s.clone(),
            FieldValue::Number(d) => d.normalize().to_string(),
            FieldValue::Date(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            FieldValue::Boolean(b) => b.to_string(),
        }
    }

    /// Typed JSON for the assembled product
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(d) => {
                serde_json::from_str::<serde_json::Number>(&d.normalize().to_string())
                    .map(Value::Number)
                    .unwrap_or_else(|_| Value::String(d.to_string()))
            }
            FieldValue::Boolean(b) => Value::Bool(*b),
            other => Value::String(other.to_stored()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(field_type: FieldType, options: Option<&str>) -> CategoryField {
        CategoryField {
            id: 1,
            category_id: 1,
            name: "colore".into(),
            slug: "colore".into(),
            label: "Colore".into(),
            field_type,
            is_required: false,
            options: options.map(str::to_string),
            display_order: 0,
            show_in_table: false,
            show_in_graph: false,
        }
    }

    #[test]
    fn test_blank_input_is_absent() {
        let f = field(FieldType::Text, None);
        assert_eq!(FieldValue::from_input(&f, &Value::Null).unwrap(), None);
        assert_eq!(FieldValue::from_input(&f, &json!("   ")).unwrap(), None);
    }

    #[test]
    fn test_number_input() {
        let f = field(FieldType::Number, None);
        let v = FieldValue::from_input(&f, &json!("€ 1.250,50")).unwrap().unwrap();
        assert_eq!(v.to_stored(), "1250.5");
        let v = FieldValue::from_input(&f, &json!(42)).unwrap().unwrap();
        assert_eq!(v.to_json(), json!(42));

        let err = FieldValue::from_input(&f, &json!("abc")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FieldValueInvalid);
        assert_eq!(err.message, "Field Colore must be a number");
    }

    #[test]
    fn test_boolean_input() {
        let f = field(FieldType::Boolean, None);
        let v = FieldValue::from_input(&f, &json!("sì")).unwrap().unwrap();
        assert_eq!(v.to_json(), json!(true));
        let v = FieldValue::from_input(&f, &json!(0)).unwrap().unwrap();
        assert_eq!(v.to_stored(), "false");
        assert!(FieldValue::from_input(&f, &json!("forse")).is_err());
    }

    #[test]
    fn test_date_input() {
        let f = field(FieldType::Date, None);
        let v = FieldValue::from_input(&f, &json!("15/03/2024")).unwrap().unwrap();
        assert_eq!(v.to_stored(), "2024-03-15T00:00:00Z");
        assert!(FieldValue::from_input(&f, &json!(true)).is_err());
    }

    #[test]
    fn test_select_checks_options() {
        let f = field(FieldType::Select, Some("Nero, Blu"));
        let v = FieldValue::from_input(&f, &json!("Blu")).unwrap().unwrap();
        assert_eq!(v, FieldValue::Select("Blu".into()));
        assert!(FieldValue::from_input(&f, &json!("Rosso")).is_err());

        let open = field(FieldType::Select, None);
        assert!(FieldValue::from_input(&open, &json!("Rosso")).is_ok());
    }

    #[test]
    fn test_text_accepts_scalars() {
        let f = field(FieldType::Text, None);
        let v = FieldValue::from_input(&f, &json!(12)).unwrap().unwrap();
        assert_eq!(v.to_json(), json!("12"));
        assert!(FieldValue::from_input(&f, &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_from_stored_falls_back_to_text() {
        assert_eq!(
            FieldValue::from_stored(FieldType::Number, "1000"),
            FieldValue::Number(Decimal::from(1000))
        );
        assert_eq!(
            FieldValue::from_stored(FieldType::Number, "Nero"),
            FieldValue::Text("Nero".into())
        );
        assert_eq!(
            FieldValue::from_stored(FieldType::Boolean, "true").to_json(),
            json!(true)
        );
    }
}
