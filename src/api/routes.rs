//! API Routes
//!
//! Configures the Axum router with all feed server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, feed_handler, flush_handler, health_handler, stats_handler,
    write_movement_handler, write_trip_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Compression: gzip or brotli, as negotiated by `Accept-Encoding`
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/", get(feed_handler))
        .route("/feed.pb", get(feed_handler))
        .route("/trips", put(write_trip_handler))
        .route("/movements", put(write_movement_handler))
        .route("/entities", delete(flush_handler))
        .route("/entities/*key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
