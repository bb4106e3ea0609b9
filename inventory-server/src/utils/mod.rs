//! Utility modules

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
pub use validation::{require, validate_payload};
