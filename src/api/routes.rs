//! API Routes
//!
//! Configures the Axum router with all server endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, delete_handler, health_handler, read_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /create` - Write a key-value pair through to the store
/// - `GET /read/:key` - Read a value, cache first
/// - `DELETE /delete/:key` - Delete a key
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check including store reachability
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/create", post(create_handler))
        .route("/read/:key", get(read_handler))
        .route("/delete/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
