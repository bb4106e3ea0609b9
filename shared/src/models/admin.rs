//! Admin utility payloads

use serde::{Deserialize, Serialize};

use super::{Category, Customer, Product, Sale, Supplier, Watch};

/// Raw dump of every table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseView {
    pub watches: Vec<Watch>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub sales: Vec<Sale>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

/// Generic `{ success, message }` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Outcome of reconciling watch sold flags with the sales log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixSoldResult {
    pub success: bool,
    pub message: String,
    /// Watches whose flag was flipped
    pub updated: u64,
    /// Distinct watches referenced by sales
    pub total: u64,
}
