//! Shared types for the watch inventory server
//!
//! Error system, entity models, lenient input parsing and small utilities.

pub mod coerce;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
