//! API routes
//!
//! - [`health`] - liveness probe
//! - [`customers`] - customer CRUD
//! - [`suppliers`] - supplier registry
//! - [`watches`] - watches, price log, duplication
//! - [`sales`] - watch sales
//! - [`categories`] - product categories and their field definitions
//! - [`products`] - products, product sales, import, field statistics
//! - [`stats`] - dashboard totals
//! - [`admin`] - maintenance and fixed-entity imports

pub mod extract;

pub mod admin;
pub mod categories;
pub mod customers;
pub mod health;
pub mod products;
pub mod sales;
pub mod stats;
pub mod suppliers;
pub mod watches;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::AppState;
use crate::middleware::logging_middleware;

const REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Every route, without middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(suppliers::router())
        .merge(watches::router())
        .merge(sales::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(stats::router())
        .merge(admin::router())
}

/// Routes plus middleware, bound to `state`; used by the server and tests
pub fn build_app(state: AppState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // Request logging reads the id set by the layers below
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID,
        )))
        .with_state(state)
}
