//! HTTP API
//!
//! REST endpoints:
//! - `POST /api/scrape` - enqueue a JSON array of page URLs (202)
//! - `GET /api/media` - paginated, filterable media listing
//! - `GET /api/status` - pipeline counters
//! - `GET /api/health` - liveness

pub mod handlers;
pub mod routes;
pub mod server;
pub mod timing;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
pub use types::*;
