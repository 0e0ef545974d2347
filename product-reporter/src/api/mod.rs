//! API routes for product-reporter

pub mod health;
pub mod products;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/top-products", get(products::top_products))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
