//! Input validation helpers
//!
//! Bridges `validator` derive output into `AppError` and holds the few
//! hand-written checks that do not fit a derive attribute.

use std::collections::BTreeMap;

use serde_json::Value;
use shared::error::AppError;
use validator::{Validate, ValidationErrors};

/// Run the derived validation and map failures to a 400 carrying
/// `details.fields = { field: [messages] }`
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(into_app_error)
}

fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("Invalid value ({})", e.code),
            })
            .collect();
        fields.insert(to_camel_case(field.as_ref()), messages);
    }

    let summary = fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ");

    let fields_json: serde_json::Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect();

    AppError::validation(format!("Validation failed: {summary}"))
        .with_detail("fields", Value::Object(fields_json))
}

/// Payload field names are reported the way the client sent them
fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// A required id that arrived as `None`
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::validation(format!("{field} is required")).with_detail("field", field)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::CustomerCreate;

    #[test]
    fn test_validation_details_use_camel_case() {
        let payload = CustomerCreate {
            first_name: String::new(),
            last_name: "Rossi".into(),
            address: "Via Roma 1".into(),
            email: Some("not-an-email".into()),
            phone: None,
        };
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let details = err.details.unwrap();
        let fields = details.get("fields").unwrap().as_object().unwrap();
        assert!(fields.contains_key("firstName"));
        assert!(fields.contains_key("email"));
        assert_eq!(fields["firstName"][0], "First name is required");
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(3), "customerId").unwrap(), 3);
        let err = require::<i64>(None, "customerId").unwrap_err();
        assert_eq!(err.message, "customerId is required");
    }
}
