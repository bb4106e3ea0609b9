//! Watch API Module
//!
//! Fixed-schema watches, their price log and duplication.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/watches", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/price", patch(handler::update_price))
        .route("/{id}/duplicate", post(handler::duplicate))
        .route("/{id}/price-history", get(handler::price_history))
}
