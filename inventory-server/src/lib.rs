//! Watch and product inventory server
//!
//! REST backend for a watch reseller: customers, suppliers, watches and
//! their sales, plus a catalog of product categories whose attributes are
//! defined at runtime and stored as entity-attribute-value rows.

pub mod api;
pub mod core;
pub mod db;
pub mod eav;
pub mod error;
pub mod middleware;
pub mod services;
pub mod utils;

pub use crate::core::{AppState, Config};
