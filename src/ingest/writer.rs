//! Batch writer: one bulk insert per worker cycle

use crate::media::MediaTriple;
use crate::storage::{MediaStore, StorageError};
use std::sync::Arc;
use thiserror::Error;

/// A failed bulk write
///
/// The batch's media is lost; the worker logs this and carries on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("bulk insert of {rows} rows failed: {source}")]
    Storage {
        rows: usize,
        #[source]
        source: StorageError,
    },

    #[error("bulk insert task failed: {0}")]
    Task(String),
}

/// Persists a cycle's extracted media with a single storage call
#[derive(Clone)]
pub struct BatchWriter {
    store: Arc<dyn MediaStore>,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    /// Writes every triple as one record in one atomic bulk insert
    ///
    /// An empty batch returns `Ok(0)` without touching storage. The insert
    /// runs on the blocking pool so SQLite I/O never stalls runtime threads.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records written
    /// * `Err(PersistenceError)` - Nothing from this batch was stored
    pub async fn write_all(&self, triples: Vec<MediaTriple>) -> Result<usize, PersistenceError> {
        if triples.is_empty() {
            return Ok(0);
        }

        let rows = triples.len();
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || store.insert_batch(&triples))
            .await
            .map_err(|e| PersistenceError::Task(e.to_string()))?
            .map_err(|source| PersistenceError::Storage { rows, source })
    }
}
