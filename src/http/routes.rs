use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        // Chat page, served from the working directory
        .route_service("/", ServeFile::new("index.html"))
        // Liveness probe
        .route("/test", get(handlers::test))
        // The chat relay
        .route("/chat", post(handlers::chat))
        // Everything else resolves against the frontend assets
        .fallback_service(ServeDir::new(static_dir))
        // Request logging plus open cross-origin access for the widget
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
