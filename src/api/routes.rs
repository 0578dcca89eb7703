use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/movies", get(handlers::get_movies))
        .route("/catalog", post(handlers::upload_catalog))
        // Recommendations
        .route("/recommendations", get(handlers::get_recommendations))
        // Favorites
        .route(
            "/favorites",
            get(handlers::get_favorites).post(handlers::save_favorite),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
