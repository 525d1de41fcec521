//! In-memory FIFO of URLs waiting to be scraped
//!
//! The queue is unbounded and not persisted: entries still waiting when the
//! process exits are lost.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe FIFO of pending page URLs
///
/// Both operations take the internal lock, so callers never need their own
/// synchronization.
#[derive(Debug, Default)]
pub struct UrlQueue {
    entries: Mutex<VecDeque<String>>,
}

impl UrlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A panic while holding the lock cannot leave a VecDeque half-updated
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends all URLs in order
    ///
    /// Never blocks on capacity and never rejects.
    ///
    /// # Returns
    ///
    /// The queue length right after the append
    pub fn enqueue<I>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut entries = self.entries();
        entries.extend(urls);
        entries.len()
    }

    /// Removes and returns the oldest `min(n, len)` URLs
    pub fn dequeue_up_to(&self, n: usize) -> Vec<String> {
        let mut entries = self.entries();
        let take = n.min(entries.len());
        entries.drain(..take).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
