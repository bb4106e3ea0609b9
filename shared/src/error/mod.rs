//! Unified error system for the inventory server
//!
//! - [`ErrorCode`]: numeric error codes shared with the web client
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`AppError`]: error with code, message and optional details
//! - [`ErrorBody`]: JSON body of error responses
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::WatchNotFound);
//!
//! let err = AppError::validation("Invalid email format")
//!     .with_detail("field", "email");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 2);
//! assert_eq!(body.message, "Invalid email format");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
