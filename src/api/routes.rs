//! HTTP API Route Definitions

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;

use super::handlers::{self, AppState};
use super::timing::{log_slow_requests, SlowRequestThreshold};

/// Create the API router with all routes
///
/// Everything is mounted under `/api`. The body limit, slow request logging
/// and CORS come from the server configuration.
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router {
    let threshold = SlowRequestThreshold(Duration::from_millis(config.slow_request_ms));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/scrape", post(handlers::scrape))
        .route("/media", get(handlers::media))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn_with_state(threshold, log_slow_requests))
        .with_state(app_state);

    let mut app = Router::new().nest("/api", api);

    if config.cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any);
        app = app.layer(cors);
    }

    app
}
