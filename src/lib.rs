//! Media Harvester: a batching web media scraper
//!
//! This crate accepts batches of page URLs over HTTP, fetches each page,
//! extracts image and video references, and stores them in SQLite for
//! paginated retrieval.

pub mod api;
pub mod config;
pub mod ingest;
pub mod media;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Media Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid environment override {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Result type alias for Media Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use ingest::{IngestPipeline, UrlQueue};
pub use media::{MediaKind, MediaRecord, MediaTriple};
