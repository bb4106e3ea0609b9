//! Product category API Module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/product-categories | GET, POST | List / create categories |
//! | /api/product-categories/{id} | GET, PUT, DELETE | Category with its fields |
//! | /api/product-categories/{id}/fields | GET, POST | Field definitions |
//! | /api/product-categories/{id}/fields/reorder | PUT | Rewrite display order |
//! | /api/category-fields/{id} | PUT, DELETE | Single field definition |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/product-categories", category_routes())
        .nest("/api/category-fields", field_routes())
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/fields",
            get(handler::list_fields).post(handler::create_field),
        )
        .route("/{id}/fields/reorder", put(handler::reorder_fields))
}

fn field_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(handler::update_field).delete(handler::delete_field),
    )
}
