//! Sale API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sales", get(handler::list).post(handler::create))
}
