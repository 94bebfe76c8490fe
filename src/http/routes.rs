use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/session", get(handlers::get_session))
        .route("/session/file", post(handlers::select_file))
        .route("/session/analyze", post(handlers::analyze))
        .route("/session/audio", get(handlers::get_audio))
        // Key moments
        .route("/session/feedback", get(handlers::get_feedback))
        .route("/session/feedback/next", post(handlers::jump_next))
        .route(
            "/session/feedback/:index/seek",
            post(handlers::seek_moment),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        // Browser front-ends are served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
