use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes.
///
/// CORS is permissive: the search front-end is served from a different
/// origin and consumes this API directly from the browser.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::read_root))
        .route("/health", get(handlers::health_check))
        .route("/titles", get(handlers::get_titles))
        .route("/recommend", get(handlers::recommend))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
