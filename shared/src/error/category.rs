//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category derived from the thousands digit of the code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Customer errors (1xxx)
    Customer,
    /// Supplier errors (2xxx)
    Supplier,
    /// Watch errors (3xxx)
    Watch,
    /// Sale errors (4xxx)
    Sale,
    /// Category and field definition errors (5xxx)
    Catalog,
    /// Product errors (6xxx)
    Product,
    /// Bulk import errors (7xxx)
    Import,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Customer,
            2000..3000 => Self::Supplier,
            3000..4000 => Self::Watch,
            4000..5000 => Self::Sale,
            5000..6000 => Self::Catalog,
            6000..7000 => Self::Product,
            7000..8000 => Self::Import,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Watch => "watch",
            Self::Sale => "sale",
            Self::Catalog => "catalog",
            Self::Product => "product",
            Self::Import => "import",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Supplier);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Watch);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Sale);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Import);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::CustomerHasSales.category(), ErrorCategory::Customer);
        assert_eq!(ErrorCode::WatchAlreadySold.category(), ErrorCategory::Watch);
        assert_eq!(ErrorCode::FieldOrderMismatch.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::ProductHasSales.category(), ErrorCategory::Product);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Catalog).unwrap();
        assert_eq!(json, "\"catalog\"");

        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
