//! Admin API Module
//!
//! Operational utilities and the fixed-entity bulk imports.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/database-view", get(handler::database_view))
        .route("/reset-database", post(handler::reset_database))
        .route("/fix-sold-watches", post(handler::fix_sold_watches))
        .route("/import-customers", post(handler::import_customers))
        .route("/import-watches", post(handler::import_watches))
        .route("/import-suppliers", post(handler::import_suppliers))
        .route("/import-sales", post(handler::import_sales))
}
