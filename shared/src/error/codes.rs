//! Error codes for the inventory server
//!
//! Codes are grouped by domain:
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Supplier errors
//! - 3xxx: Watch errors
//! - 4xxx: Sale errors
//! - 5xxx: Catalog errors (categories and field definitions)
//! - 6xxx: Product errors
//! - 7xxx: Import errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enum
///
/// Serialized as a plain u16 so the web client can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 1001,
    /// Customer is referenced by sales
    CustomerHasSales = 1002,

    // ==================== 2xxx: Supplier ====================
    /// Supplier not found
    SupplierNotFound = 2001,

    // ==================== 3xxx: Watch ====================
    /// Watch not found
    WatchNotFound = 3001,
    /// Watch has already been sold
    WatchAlreadySold = 3002,
    /// Watch is referenced by sales
    WatchHasSales = 3003,
    /// Price is not a valid amount
    InvalidPrice = 3004,

    // ==================== 4xxx: Sale ====================
    /// Sale not found
    SaleNotFound = 4001,

    // ==================== 5xxx: Catalog ====================
    /// Category not found
    CategoryNotFound = 5001,
    /// Another category already uses this slug
    CategorySlugExists = 5002,
    /// Category still has products
    CategoryHasProducts = 5003,
    /// Field definition not found
    FieldNotFound = 5004,
    /// Another field of the category already uses this slug
    FieldSlugExists = 5005,
    /// Reorder list does not match the category's fields
    FieldOrderMismatch = 5006,
    /// Value cannot be coerced to the field's type
    FieldValueInvalid = 5007,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has already been sold
    ProductAlreadySold = 6002,
    /// Product is referenced by sales
    ProductHasSales = 6003,
    /// No free product code could be generated
    ProductCodeExhausted = 6004,
    /// A required custom field has no value
    RequiredFieldMissing = 6005,

    // ==================== 7xxx: Import ====================
    /// Import payload is malformed
    ImportInvalidPayload = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerHasSales => "Customer has associated sales",

            // Supplier
            ErrorCode::SupplierNotFound => "Supplier not found",

            // Watch
            ErrorCode::WatchNotFound => "Watch not found",
            ErrorCode::WatchAlreadySold => "Watch has already been sold",
            ErrorCode::WatchHasSales => "Watch has associated sales",
            ErrorCode::InvalidPrice => "Price must be a non-negative number",

            // Sale
            ErrorCode::SaleNotFound => "Sale not found",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategorySlugExists => "A category with this name already exists",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::FieldNotFound => "Field not found",
            ErrorCode::FieldSlugExists => "A field with this name already exists in the category",
            ErrorCode::FieldOrderMismatch => {
                "Field order must list every field of the category exactly once"
            }
            ErrorCode::FieldValueInvalid => "Invalid value for field",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductAlreadySold => "Product has already been sold",
            ErrorCode::ProductHasSales => "Product has associated sales",
            ErrorCode::ProductCodeExhausted => "Could not generate a unique product code",
            ErrorCode::RequiredFieldMissing => "Required field is missing",

            // Import
            ErrorCode::ImportInvalidPayload => "Invalid import payload",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Numeric code with no matching variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Customer
            1001 => Ok(ErrorCode::CustomerNotFound),
            1002 => Ok(ErrorCode::CustomerHasSales),

            // Supplier
            2001 => Ok(ErrorCode::SupplierNotFound),

            // Watch
            3001 => Ok(ErrorCode::WatchNotFound),
            3002 => Ok(ErrorCode::WatchAlreadySold),
            3003 => Ok(ErrorCode::WatchHasSales),
            3004 => Ok(ErrorCode::InvalidPrice),

            // Sale
            4001 => Ok(ErrorCode::SaleNotFound),

            // Catalog
            5001 => Ok(ErrorCode::CategoryNotFound),
            5002 => Ok(ErrorCode::CategorySlugExists),
            5003 => Ok(ErrorCode::CategoryHasProducts),
            5004 => Ok(ErrorCode::FieldNotFound),
            5005 => Ok(ErrorCode::FieldSlugExists),
            5006 => Ok(ErrorCode::FieldOrderMismatch),
            5007 => Ok(ErrorCode::FieldValueInvalid),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductAlreadySold),
            6003 => Ok(ErrorCode::ProductHasSales),
            6004 => Ok(ErrorCode::ProductCodeExhausted),
            6005 => Ok(ErrorCode::RequiredFieldMissing),

            // Import
            7001 => Ok(ErrorCode::ImportInvalidPayload),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 1001);
        assert_eq!(ErrorCode::SupplierNotFound.code(), 2001);
        assert_eq!(ErrorCode::WatchAlreadySold.code(), 3002);
        assert_eq!(ErrorCode::SaleNotFound.code(), 4001);
        assert_eq!(ErrorCode::CategorySlugExists.code(), 5002);
        assert_eq!(ErrorCode::RequiredFieldMissing.code(), 6005);
        assert_eq!(ErrorCode::ImportInvalidPayload.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::CustomerNotFound,
            ErrorCode::CustomerHasSales,
            ErrorCode::SupplierNotFound,
            ErrorCode::WatchNotFound,
            ErrorCode::WatchAlreadySold,
            ErrorCode::WatchHasSales,
            ErrorCode::InvalidPrice,
            ErrorCode::SaleNotFound,
            ErrorCode::CategoryNotFound,
            ErrorCode::CategorySlugExists,
            ErrorCode::CategoryHasProducts,
            ErrorCode::FieldNotFound,
            ErrorCode::FieldSlugExists,
            ErrorCode::FieldOrderMismatch,
            ErrorCode::FieldValueInvalid,
            ErrorCode::ProductNotFound,
            ErrorCode::ProductAlreadySold,
            ErrorCode::ProductHasSales,
            ErrorCode::ProductCodeExhausted,
            ErrorCode::RequiredFieldMissing,
            ErrorCode::ImportInvalidPayload,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
        assert_eq!(ErrorCode::try_from(3005), Err(InvalidErrorCode(3005)));
        assert_eq!(ErrorCode::try_from(8000), Err(InvalidErrorCode(8000)));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ProductAlreadySold).unwrap(),
            "6002"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("5001").unwrap();
        assert_eq!(code, ErrorCode::CategoryNotFound);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::WatchNotFound), "3001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::WatchAlreadySold.message(), "Watch has already been sold");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = ErrorCode::try_from(5).unwrap_err();
        assert_eq!(err.to_string(), "invalid error code: 5");
    }
}
