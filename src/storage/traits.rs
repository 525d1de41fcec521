//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::media::{MediaKind, MediaTriple};
use crate::storage::{MediaPage, MediaQuery};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage connection lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for media storage backends
///
/// Implementations are shared between the ingestion worker and the HTTP
/// handlers, so they must provide their own synchronization. All methods are
/// blocking; async callers run them on the blocking thread pool.
pub trait MediaStore: Send + Sync {
    /// Inserts every triple as one record in a single atomic write
    ///
    /// Either all rows are stored or none are. An empty slice performs no
    /// write and returns 0.
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    fn insert_batch(&self, triples: &[MediaTriple]) -> StorageResult<usize>;

    /// Returns one page of records, newest first, with the total match count
    fn query_media(&self, query: &MediaQuery) -> StorageResult<MediaPage>;

    /// Counts records of one kind
    fn count_by_kind(&self, kind: MediaKind) -> StorageResult<u64>;

    /// Counts all records
    fn count_total(&self) -> StorageResult<u64>;
}
