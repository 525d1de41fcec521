//! Ingestion pipeline
//!
//! Submitted URLs land in an in-memory FIFO queue. A single-flight worker
//! drains it in fixed-size batches: each URL in a batch is fetched and
//! scanned for media concurrently, and the batch's media is persisted with
//! one bulk write.
//!
//! Failures never escape the pipeline. Bad URLs, timeouts and non-2xx
//! responses are skipped; a failed bulk write drops that batch's media.

mod extractor;
mod fetcher;
mod queue;
mod worker;
mod writer;

pub use extractor::extract_media;
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchErrorKind, FetchedPage};
pub use queue::UrlQueue;
pub use worker::{IngestPipeline, PipelineStats};
pub use writer::{BatchWriter, PersistenceError};
