//! Data models
//!
//! Entities and request/response payloads shared by the server and its
//! tests. JSON uses camelCase field names, which is what the web client
//! expects. Row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod admin;
pub mod category;
pub mod customer;
pub mod field;
pub mod import;
pub mod product;
pub mod sale;
pub mod stats;
pub mod supplier;
pub mod validate;
pub mod watch;

// Re-exports
pub use admin::*;
pub use category::*;
pub use customer::*;
pub use field::*;
pub use import::*;
pub use product::*;
pub use sale::*;
pub use stats::*;
pub use supplier::*;
pub use watch::*;
