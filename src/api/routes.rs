use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/movies", get(handlers::list_movies))
        .route("/recommendations", get(handlers::recommend))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:session_id", delete(handlers::delete_session))
        .route("/sessions/:session_id/history", get(handlers::get_history))
        .route(
            "/sessions/:session_id/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route(
            "/sessions/:session_id/watchlist/:title",
            delete(handlers::remove_from_watchlist),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
