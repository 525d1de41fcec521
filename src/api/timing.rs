//! Slow request logging middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::warn;

/// Requests slower than this are logged at `warn`
#[derive(Debug, Clone, Copy)]
pub struct SlowRequestThreshold(pub Duration);

/// Times each request and warns when it exceeds the threshold
pub async fn log_slow_requests(
    State(threshold): State<SlowRequestThreshold>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed();
    if elapsed > threshold.0 {
        warn!(
            "Slow request: {} {} took {}ms (status {})",
            method,
            uri,
            elapsed.as_millis(),
            response.status().as_u16()
        );
    }

    response
}
