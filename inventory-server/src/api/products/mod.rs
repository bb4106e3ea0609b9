//! Product API Module

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    // `/stats` and `/import` win over `/{id}`
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats", get(handler::field_stats))
        .route("/import", post(handler::import))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/sold", patch(handler::sell))
        .route("/{id}/sales", get(handler::sales))
}
