//! Ingestion pipeline - queue plus single-flight batch worker
//!
//! The pipeline owns the URL queue and the worker state machine:
//!
//! - `Idle`: no cycle running. A trigger with a non-empty queue starts one.
//! - `Running`: exactly one cycle is in flight. Triggers are no-ops; the
//!   running cycle reschedules itself while the queue is non-empty.
//!
//! Each cycle dequeues up to `batch_size` URLs, fetches and extracts them
//! concurrently, then hands every extracted triple to the batch writer in a
//! single call. The next cycle is spawned as a fresh task so the runtime can
//! serve HTTP requests and other I/O between cycles.

use crate::config::{UserAgentConfig, WorkerConfig};
use crate::ingest::extractor::extract_media;
use crate::ingest::fetcher::{build_http_client, fetch_page, FetchError};
use crate::ingest::queue::UrlQueue;
use crate::ingest::writer::BatchWriter;
use crate::media::MediaTriple;
use crate::storage::MediaStore;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::task::JoinSet;

/// Counters describing pipeline activity since start-up
#[derive(Debug, Default)]
struct PipelineCounters {
    cycles_completed: AtomicU64,
    urls_processed: AtomicU64,
    fetch_failures: AtomicU64,
    media_written: AtomicU64,
    persistence_failures: AtomicU64,
    active_cycles: AtomicUsize,
    max_concurrent_cycles: AtomicUsize,
}

/// Point-in-time copy of the pipeline counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub queue_length: usize,
    pub running: bool,
    pub cycles_completed: u64,
    /// URLs fetched successfully (extraction may still have found nothing)
    pub urls_processed: u64,
    pub fetch_failures: u64,
    pub media_written: u64,
    pub persistence_failures: u64,
    /// Highest number of cycles ever observed running at once
    pub max_concurrent_cycles: usize,
}

/// The ingestion pipeline: queue, single-flight worker, fetcher and writer
pub struct IngestPipeline {
    queue: UrlQueue,
    running: AtomicBool,
    client: Client,
    writer: BatchWriter,
    batch_size: usize,
    fetch_timeout: Duration,
    counters: PipelineCounters,
    idle: Notify,
}

impl IngestPipeline {
    /// Creates a pipeline from configuration
    ///
    /// # Arguments
    ///
    /// * `worker` - Batch size and fetch timeout
    /// * `user_agent` - Identification sent with every fetch
    /// * `store` - Destination for extracted media
    pub fn new(
        worker: &WorkerConfig,
        user_agent: &UserAgentConfig,
        store: Arc<dyn MediaStore>,
    ) -> Result<Arc<Self>, reqwest::Error> {
        let fetch_timeout = Duration::from_millis(worker.fetch_timeout_ms);
        let client = build_http_client(user_agent, fetch_timeout)?;
        Ok(Self::with_client(
            client,
            store,
            worker.batch_size,
            fetch_timeout,
        ))
    }

    /// Creates a pipeline around an existing HTTP client
    pub fn with_client(
        client: Client,
        store: Arc<dyn MediaStore>,
        batch_size: usize,
        fetch_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            queue: UrlQueue::new(),
            running: AtomicBool::new(false),
            client,
            writer: BatchWriter::new(store),
            batch_size: batch_size.max(1),
            fetch_timeout,
            counters: PipelineCounters::default(),
            idle: Notify::new(),
        })
    }

    /// Enqueues URLs and wakes the worker if it is idle
    ///
    /// Returns immediately; nothing about individual URLs is ever reported
    /// back to the submitter.
    ///
    /// # Returns
    ///
    /// The queue length right after the append
    pub fn submit(self: &Arc<Self>, urls: Vec<String>) -> usize {
        let count = urls.len();
        let queue_length = self.queue.enqueue(urls);
        tracing::info!("Accepted {} URLs (queue length {})", count, queue_length);
        self.trigger();
        queue_length
    }

    /// Starts a cycle if none is running and there is work
    ///
    /// The running flag is checked and set in one atomic step, so concurrent
    /// triggers start at most one cycle. Must be called within a Tokio
    /// runtime.
    ///
    /// # Returns
    ///
    /// `true` if this call started a cycle
    pub fn trigger(self: &Arc<Self>) -> bool {
        if self.queue.is_empty() {
            return false;
        }

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.run_cycle().await });
        true
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the pipeline counters
    pub fn stats(&self) -> PipelineStats {
        let c = &self.counters;
        PipelineStats {
            queue_length: self.queue.len(),
            running: self.is_running(),
            cycles_completed: c.cycles_completed.load(Ordering::Relaxed),
            urls_processed: c.urls_processed.load(Ordering::Relaxed),
            fetch_failures: c.fetch_failures.load(Ordering::Relaxed),
            media_written: c.media_written.load(Ordering::Relaxed),
            persistence_failures: c.persistence_failures.load(Ordering::Relaxed),
            max_concurrent_cycles: c.max_concurrent_cycles.load(Ordering::Relaxed),
        }
    }

    /// Waits until the worker is idle and the queue is empty
    pub async fn wait_until_idle(&self) {
        loop {
            // Registered before the check so a wake-up in between is not missed
            let notified = self.idle.notified();
            if !self.is_running() && self.queue.is_empty() {
                return;
            }
            notified.await;
        }
    }

    /// One worker cycle; reschedules itself while work remains
    async fn run_cycle(self: Arc<Self>) {
        let active = self.counters.active_cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters
            .max_concurrent_cycles
            .fetch_max(active, Ordering::SeqCst);

        let batch = self.queue.dequeue_up_to(self.batch_size);
        if !batch.is_empty() {
            self.process_batch(batch).await;
        }

        self.counters.cycles_completed.fetch_add(1, Ordering::Relaxed);
        self.counters.active_cycles.fetch_sub(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);

        // A submit that raced with the flag release saw `running == true` and
        // did not start a cycle; its URLs are visible here.
        if !self.queue.is_empty() {
            self.trigger();
        }

        self.idle.notify_waiters();
    }

    /// Fetches, extracts and persists one batch
    async fn process_batch(&self, batch: Vec<String>) {
        let started = Instant::now();
        let batch_len = batch.len();

        let triples = self.fetch_and_extract(batch).await;
        let found = triples.len();

        match self.writer.write_all(triples).await {
            Ok(written) => {
                self.counters
                    .media_written
                    .fetch_add(written as u64, Ordering::Relaxed);
            }
            Err(e) => {
                self.counters
                    .persistence_failures
                    .fetch_add(1, Ordering::Relaxed);
                tracing::error!("Dropping {} media from batch: {}", found, e);
            }
        }

        tracing::info!(
            "Processed batch of {} URLs in {}ms ({} media found). Queue remaining: {}",
            batch_len,
            started.elapsed().as_millis(),
            found,
            self.queue.len()
        );
    }

    /// Runs fetch + extract for every URL concurrently and gathers the triples
    ///
    /// Per-URL failures are counted and logged, never propagated.
    async fn fetch_and_extract(&self, batch: Vec<String>) -> Vec<MediaTriple> {
        let mut tasks = JoinSet::new();
        for url in batch {
            let client = self.client.clone();
            let timeout = self.fetch_timeout;
            tasks.spawn(async move {
                let page = fetch_page(&client, &url, timeout).await?;
                Ok::<_, FetchError>(extract_media(&page.html, &page.source_url))
            });
        }

        let mut triples = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(found)) => {
                    self.counters.urls_processed.fetch_add(1, Ordering::Relaxed);
                    triples.extend(found);
                }
                Ok(Err(e)) => {
                    self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Skipping URL: {}", e);
                }
                Err(e) => {
                    self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("Fetch task aborted: {}", e);
                }
            }
        }

        triples
    }
}
