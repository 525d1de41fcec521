//! HTTP fetcher implementation
//!
//! This module handles all outgoing page requests, including:
//! - Building the HTTP client with an identifying user agent
//! - GET requests with a hard per-request deadline
//! - Error classification (timeout, network, non-2xx status, body read)

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// A successfully downloaded page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Response body as text
    pub html: String,

    /// The URL as it was submitted (not the post-redirect URL)
    pub source_url: String,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    #[error("request timed out")]
    Timeout,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),
}

/// A failed fetch of one URL
///
/// These are expected and frequent; the worker skips the URL and moves on.
#[derive(Debug, Clone, Error)]
#[error("failed to fetch {url}: {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FetchErrorKind::Timeout
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request deadline, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use media_harvester::config::UserAgentConfig;
/// use media_harvester::ingest::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, failing with `Timeout` once `timeout` has elapsed
///
/// The client carries its own timeout as well; the outer deadline here makes
/// the bound hold regardless of how the remote server behaves (slow headers,
/// trickled body, stalled TLS).
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Hard deadline for the whole fetch
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, FetchError> {
    match tokio::time::timeout(timeout, fetch_body(client, url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::new(url, FetchErrorKind::Timeout)),
    }
}

async fn fetch_body(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::new(url, classify_error(&e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(url, FetchErrorKind::Status(status.as_u16())));
    }

    let html = response.text().await.map_err(|e| {
        let kind = if e.is_timeout() {
            FetchErrorKind::Timeout
        } else {
            FetchErrorKind::Body(e.to_string())
        };
        FetchError::new(url, kind)
    })?;

    Ok(FetchedPage {
        html,
        source_url: url.to_string(),
    })
}

/// Maps a request error onto a fetch error kind
fn classify_error(e: &reqwest::Error) -> FetchErrorKind {
    if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_builder() {
        FetchErrorKind::InvalidUrl(e.to_string())
    } else if e.is_connect() {
        FetchErrorKind::Network(format!("connection failed: {}", e))
    } else {
        FetchErrorKind::Network(e.to_string())
    }
}
