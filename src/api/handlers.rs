//! HTTP API Request Handlers
//!
//! Handlers that map HTTP requests onto the ingestion pipeline and the
//! media store.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use crate::ingest::IngestPipeline;
use crate::storage::MediaStore;

use super::types::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestPipeline>,
    pub store: Arc<dyn MediaStore>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Scrape submission endpoint
///
/// Enqueues every URL and answers 202 straight away; the outcome of each
/// URL is never reported back.
pub async fn scrape(State(state): State<AppState>, body: Bytes) -> Response {
    let urls = match parse_url_list(&body) {
        Ok(urls) => urls,
        Err(message) => {
            debug!("Rejected scrape request: {}", message);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(message)),
            )
                .into_response();
        }
    };

    let accepted = urls.len();
    let queue_length = state.pipeline.submit(urls);

    (
        StatusCode::ACCEPTED,
        Json(ScrapeAccepted::new(accepted, queue_length)),
    )
        .into_response()
}

/// Media listing endpoint
pub async fn media(
    State(state): State<AppState>,
    params: Result<Query<MediaParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response();
        }
    };

    let query = match params.into_query() {
        Ok(query) => query,
        Err(kind) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(format!(
                    "Unknown media type '{}', expected IMAGE or VIDEO",
                    kind
                ))),
            )
                .into_response();
        }
    };

    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || store.query_media(&query)).await {
        Ok(Ok(page)) => (StatusCode::OK, Json(MediaPageResponse::from(page))).into_response(),
        Ok(Err(e)) => {
            error!("Media query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error("Failed to query media")),
            )
                .into_response()
        }
        Err(e) => {
            error!("Media query task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error("Query task failed")),
            )
                .into_response()
        }
    }
}

/// Pipeline status endpoint
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse::from(state.pipeline.stats()))
}

/// Parses a scrape body: a JSON array whose elements are all strings
fn parse_url_list(body: &[u8]) -> Result<Vec<String>, String> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| format!("Request body is not valid JSON: {}", e))?;

    let Value::Array(items) = value else {
        return Err("Request body must be a JSON array of URLs".to_string());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(url) => Ok(url),
            other => Err(format!("Element {} is not a string: {}", i, other)),
        })
        .collect()
}
