//! Integration tests for the HTTP API
//!
//! Requests are driven in-process through the router with
//! `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use media_harvester::api::{create_router, AppState, MediaPageResponse};
use media_harvester::config::ServerConfig;
use media_harvester::storage::{
    MediaPage, MediaQuery, MediaStore, SqliteStorage, StorageError, StorageResult,
};
use media_harvester::{IngestPipeline, MediaKind, MediaTriple};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    storage: Arc<SqliteStorage>,
    pipeline: Arc<IngestPipeline>,
}

impl TestApp {
    fn new() -> Self {
        let storage = Arc::new(SqliteStorage::open_in_memory().expect("Failed to open database"));
        let store: Arc<dyn MediaStore> = storage.clone();
        let pipeline = IngestPipeline::with_client(
            reqwest::Client::new(),
            Arc::clone(&store),
            20,
            Duration::from_secs(5),
        );
        let state = AppState {
            pipeline: Arc::clone(&pipeline),
            store,
        };

        Self {
            router: create_router(state, &ServerConfig::default()),
            storage,
            pipeline,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn seed(&self, triples: &[MediaTriple]) {
        self.storage.insert_batch(triples).unwrap();
    }
}

/// Store whose reads always fail
struct UnavailableStore;

impl MediaStore for UnavailableStore {
    fn insert_batch(&self, triples: &[MediaTriple]) -> StorageResult<usize> {
        Ok(triples.len())
    }

    fn query_media(&self, _query: &MediaQuery) -> StorageResult<MediaPage> {
        Err(StorageError::Database("disk I/O error at /var/lib/media.db".to_string()))
    }

    fn count_by_kind(&self, _kind: MediaKind) -> StorageResult<u64> {
        Ok(0)
    }

    fn count_total(&self) -> StorageResult<u64> {
        Ok(0)
    }
}

fn image(page: &str, media: &str) -> MediaTriple {
    MediaTriple::new(page, media, MediaKind::Image)
}

fn video(page: &str, media: &str) -> MediaTriple {
    MediaTriple::new(page, media, MediaKind::Video)
}

#[tokio::test]
async fn test_scrape_accepts_url_array() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<img src="https://cdn/1.png">"#),
        )
        .mount(&mock_server)
        .await;
    let app = TestApp::new();

    let body = serde_json::to_string(&vec![
        format!("{}/a", mock_server.uri()),
        format!("{}/b", mock_server.uri()),
    ])
    .unwrap();
    let (status, json) = app.post_json("/api/scrape", &body).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["message"], "Accepted 2 URLs for processing.");
    assert_eq!(json["queueLength"], 2);

    tokio::time::timeout(Duration::from_secs(10), app.pipeline.wait_until_idle())
        .await
        .unwrap();
    assert_eq!(app.storage.count_by_kind(MediaKind::Image).unwrap(), 2);
}

#[tokio::test]
async fn test_scrape_accepts_empty_array() {
    let app = TestApp::new();

    let (status, json) = app.post_json("/api/scrape", "[]").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["message"], "Accepted 0 URLs for processing.");
    assert_eq!(json["queueLength"], 0);
    assert!(!app.pipeline.is_running());
}

#[tokio::test]
async fn test_scrape_rejects_bad_bodies() {
    let app = TestApp::new();

    for body in [
        r#"{"urls": []}"#,
        r#""https://example.com/""#,
        r#"["https://example.com/", null]"#,
        r#"[1, 2, 3]"#,
        "not json",
    ] {
        let (status, json) = app.post_json("/api/scrape", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json["error"], "Bad Request");
    }

    assert_eq!(app.pipeline.queue_len(), 0);
}

#[tokio::test]
async fn test_media_type_filter_and_pagination() {
    let app = TestApp::new();
    app.seed(&[image("https://p/", "https://m/1.png")]);
    app.seed(&[video("https://p/", "https://m/1.mp4")]);
    app.seed(&[image("https://p/", "https://m/2.png")]);
    app.seed(&[image("https://p/", "https://m/3.png")]);

    let (status, json) = app.get("/api/media?type=IMAGE&size=2&page=0").await;
    assert_eq!(status, StatusCode::OK);

    let page: MediaPageResponse = serde_json::from_value(json).unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.number, 0);
    assert_eq!(page.size, 2);
    assert!(page.content.iter().all(|r| r.kind == MediaKind::Image));
    assert_eq!(page.content[0].media_url, "https://m/3.png");
    assert_eq!(page.content[1].media_url, "https://m/2.png");

    let (_, json) = app.get("/api/media?type=IMAGE&size=2&page=1").await;
    let second: MediaPageResponse = serde_json::from_value(json).unwrap();
    assert_eq!(second.content.len(), 1);
    assert_eq!(second.content[0].media_url, "https://m/1.png");
}

#[tokio::test]
async fn test_media_defaults_and_past_last_page() {
    let app = TestApp::new();
    app.seed(&[
        image("https://p/", "https://m/1.png"),
        video("https://p/", "https://m/1.mp4"),
    ]);

    let (status, json) = app.get("/api/media").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["size"], 20);
    assert_eq!(json["number"], 0);
    assert_eq!(json["totalElements"], 2);
    assert_eq!(json["content"][0]["type"], "VIDEO");

    let (status, json) = app.get("/api/media?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["content"].as_array().unwrap().is_empty());
    assert_eq!(json["totalElements"], 2);
}

#[tokio::test]
async fn test_media_requery_is_stable() {
    let app = TestApp::new();
    app.seed(&[
        image("https://shop.example/", "https://m/a.png"),
        image("https://blog.example/", "https://m/b.png"),
    ]);

    let (_, first) = app.get("/api/media?search=SHOP&size=5").await;
    let (_, second) = app.get("/api/media?search=SHOP&size=5").await;

    assert_eq!(first, second);
    assert_eq!(first["totalElements"], 1);
}

#[tokio::test]
async fn test_media_rejects_unknown_type() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/media?type=image").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn test_media_storage_failure_is_internal_error() {
    let store: Arc<dyn MediaStore> = Arc::new(UnavailableStore);
    let pipeline = IngestPipeline::with_client(
        reqwest::Client::new(),
        Arc::clone(&store),
        20,
        Duration::from_secs(5),
    );
    let router = create_router(AppState { pipeline, store }, &ServerConfig::default());

    let request = Request::get("/api/media?page=0&size=12")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error");
    assert_eq!(json["message"], "Failed to query media");
    assert!(!bytes.windows(8).any(|w| w == b"/var/lib"));
}

#[tokio::test]
async fn test_status_reports_counters() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["queueLength"], 0);
    assert_eq!(json["running"], false);
    assert_eq!(json["cyclesCompleted"], 0);
    assert_eq!(json["mediaWritten"], 0);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["healthy"], true);
}
