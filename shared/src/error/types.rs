//! Application error and its JSON body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every failed request is rendered from one of these: the code selects the
/// HTTP status, the message is shown to the user and `details` carries
/// machine-readable context such as per-field validation messages.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    /// Human-readable message, shown by the client as a notification
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the default message of `code`
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Malformed or missing input
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Unique value already taken, e.g. a product code supplied by the client
    pub fn already_exists(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::AlreadyExists, format!("{r} already exists"))
            .with_detail("resource", r)
    }

    /// Required custom field without a value; the message names the label
    pub fn required_field(label: &str) -> Self {
        Self::with_message(
            ErrorCode::RequiredFieldMissing,
            format!("Field {label} is required"),
        )
        .with_detail("field", label)
    }
}

/// Error response body: `{ code, message, details? }`
///
/// Successful requests return the entity JSON directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (self.http_status(), axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::WatchNotFound);
        assert_eq!(err.message, ErrorCode::WatchNotFound.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn test_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "email")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["field"], "email");
        assert_eq!(details["reason"], "required");
    }

    #[test]
    fn test_required_field_names_label() {
        let err = AppError::required_field("Colore");
        assert_eq!(err.code, ErrorCode::RequiredFieldMissing);
        assert_eq!(err.message, "Field Colore is required");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_already_exists() {
        let err = AppError::already_exists("Product code ROL-1");
        assert_eq!(err.message, "Product code ROL-1 already exists");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body_json() {
        let err = AppError::with_message(ErrorCode::CustomerNotFound, "Customer 7 not found")
            .with_detail("id", 7);
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["code"], ErrorCode::CustomerNotFound.code());
        assert_eq!(json["message"], "Customer 7 not found");
        assert_eq!(json["details"]["id"], 7);

        let bare = AppError::new(ErrorCode::NotFound);
        let bare = serde_json::to_value(ErrorBody::from(&bare)).unwrap();
        assert!(bare.get("details").is_none());
    }
}
