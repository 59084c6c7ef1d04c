use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::app_state::AppState;
use crate::handlers;

/// Create the main application router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Static tool catalog
        .route("/api/tools", get(handlers::list_tools))
        // Upstream-backed tools
        .route("/api/bayut/search", post(handlers::search_listings))
        .route("/api/dubai-rest/verify-title", post(handlers::verify_title))
        // Local calculator
        .route("/api/chiller/calculate", post(handlers::calculate_chiller_cost))
        .route("/api/chiller/compare", post(handlers::compare_chiller_costs))
        .route("/api/chiller/providers", get(handlers::list_providers))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
