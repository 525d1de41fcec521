//! HTTP API Request/Response Types
//!
//! JSON-serializable types for the HTTP API. Field names are camelCase on
//! the wire to match what the gallery front-end reads.

use serde::{Deserialize, Serialize};

use crate::ingest::PipelineStats;
use crate::media::{MediaKind, MediaRecord};
use crate::storage::{MediaPage, MediaQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Response to an accepted scrape submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeAccepted {
    pub message: String,
    /// Queue length right after the submitted URLs were appended
    pub queue_length: usize,
}

impl ScrapeAccepted {
    pub fn new(accepted: usize, queue_length: usize) -> Self {
        Self {
            message: format!("Accepted {} URLs for processing.", accepted),
            queue_length,
        }
    }
}

/// Query string of `GET /api/media`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub search: Option<String>,
}

impl MediaParams {
    /// Converts raw parameters into a storage query
    ///
    /// Missing values take their defaults and `size` is clamped into range.
    /// A blank `type` means no filter; any other value must name a kind
    /// exactly, otherwise the offending value is returned.
    pub fn into_query(self) -> Result<MediaQuery, String> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(MediaKind::from_db_string(raw).ok_or_else(|| raw.to_string())?),
        };

        Ok(MediaQuery {
            page: self.page.unwrap_or(0),
            size: self
                .size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            kind,
            search: self.search,
        })
    }
}

/// One page of media, shaped like a Spring `Page`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPageResponse {
    pub content: Vec<MediaRecord>,
    pub total_pages: u64,
    pub total_elements: u64,
    /// Zero-based page number
    pub number: u32,
    pub size: u32,
}

impl From<MediaPage> for MediaPageResponse {
    fn from(page: MediaPage) -> Self {
        Self {
            total_pages: page.total_pages(),
            total_elements: page.total_elements,
            number: page.page,
            size: page.size,
            content: page.records,
        }
    }
}

/// Pipeline status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub queue_length: usize,
    pub running: bool,
    pub cycles_completed: u64,
    pub urls_processed: u64,
    pub fetch_failures: u64,
    pub media_written: u64,
    pub persistence_failures: u64,
}

impl From<PipelineStats> for StatusResponse {
    fn from(stats: PipelineStats) -> Self {
        Self {
            queue_length: stats.queue_length,
            running: stats.running,
            cycles_completed: stats.cycles_completed,
            urls_processed: stats.urls_processed,
            fetch_failures: stats.fetch_failures,
            media_written: stats.media_written,
            persistence_failures: stats.persistence_failures,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error title
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("Internal Server Error", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("Bad Request", message)
    }
}
