//! Storage module for persisting discovered media
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Bulk insertion of extracted media in one transaction
//! - Filtered, paginated reads for the query endpoint

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{MediaStore, StorageError, StorageResult};

use crate::config::DatabaseConfig;
use crate::media::{MediaKind, MediaRecord};

/// Default page length for media queries
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page length a query may request
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Opens the storage described by the database configuration
///
/// `:memory:` opens a private in-memory database; anything else is treated
/// as a file path, created if missing.
pub fn open_storage(config: &DatabaseConfig) -> StorageResult<SqliteStorage> {
    if config.is_in_memory() {
        SqliteStorage::open_in_memory()
    } else {
        SqliteStorage::new(std::path::Path::new(config.path()))
    }
}

/// Filter and pagination parameters for reading media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    /// Zero-based page number
    pub page: u32,

    /// Page length, at least 1
    pub size: u32,

    /// Exact-match kind filter
    pub kind: Option<MediaKind>,

    /// Case-insensitive substring filter on the source page URL
    pub search: Option<String>,
}

impl Default for MediaQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            kind: None,
            search: None,
        }
    }
}

impl MediaQuery {
    /// Number of rows to skip before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// The search term, if it is non-blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of media records plus the total number of matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPage {
    pub records: Vec<MediaRecord>,
    pub total_elements: u64,
    pub page: u32,
    pub size: u32,
}

impl MediaPage {
    /// Total number of pages at this page size
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }
}
