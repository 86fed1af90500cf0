//! Router configuration for the HTTP API.
//!
//! Sets up the routes and middleware (timeout, CORS, compression, tracing)
//! and returns an axum router ready for serving.

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::config::DEFAULT_REQUEST_TIMEOUT_SEC;
use super::handlers;
use super::state::AppState;

/// Create the application router with the default request timeout.
pub fn create_router(state: AppState) -> Router {
    create_router_with_timeout(state, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SEC))
}

/// Create the application router. Requests running longer than
/// `request_timeout` are abandoned with `408 Request Timeout`.
pub fn create_router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    // The API is read-only and public.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/river", get(handlers::get_river_readings))
        .route("/rainfall/{station}", get(handlers::get_rainfall_readings))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
