//! Bulk import payloads and results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Import body for the fixed entities.
///
/// `mappings` maps target field name → source column. Without mappings the
/// row keys are taken as target field names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub mappings: Option<HashMap<String, String>>,
    #[serde(default)]
    pub data: Value,
}

/// Import body for `POST /api/products/import`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImportRequest {
    pub category_id: Option<i64>,
    #[serde(default)]
    pub mappings: Option<HashMap<String, String>>,
    #[serde(default)]
    pub data: Value,
}

/// One raw spreadsheet row
pub type ImportRow = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// 1-based row number
    pub row: usize,
    pub message: String,
}

/// Aggregate outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub success: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn fail(&mut self, index: usize, message: impl Into<String>) {
        self.errors.push(ImportRowError {
            row: index + 1,
            message: message.into(),
        });
    }
}
