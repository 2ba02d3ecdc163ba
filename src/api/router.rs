use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Catalog (read-only surface)
        .route("/api/products", get(handlers::products::list))
        .route("/api/products/:id", get(handlers::products::detail))
        .route("/api/products/:id/price-history", get(handlers::products::price_history))
        // Optimization lifecycle
        .route("/api/optimize-price", post(handlers::optimize::optimize))
        .route(
            "/api/products/:id/optimization-history",
            get(handlers::optimize::history),
        )
        .route(
            "/api/products/:id/apply-optimization/:result_id",
            post(handlers::optimize::apply),
        );

    let ops = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // CORS: the dashboard is served from the same origin in production;
    // open for local development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
