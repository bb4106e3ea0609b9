//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::SupplierNotFound
            | Self::WatchNotFound
            | Self::SaleNotFound
            | Self::CategoryNotFound
            | Self::FieldNotFound
            | Self::ProductNotFound => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ProductCodeExhausted => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // Validation, duplicates and business rules all surface as 400
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CustomerNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::WatchNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CategoryNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::FieldNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ProductNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_business_rules_are_bad_request() {
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::CategorySlugExists.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::CategoryHasProducts.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::FieldOrderMismatch.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::WatchAlreadySold.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ProductHasSales.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::CustomerHasSales.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::RequiredFieldMissing.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
