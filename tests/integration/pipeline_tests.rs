//! Integration tests for the ingestion pipeline
//!
//! These tests use wiremock to serve pages and run the full
//! submit -> fetch -> extract -> store cycle against an on-disk database.

use media_harvester::config::{DatabaseConfig, UserAgentConfig, WorkerConfig};
use media_harvester::storage::{open_storage, MediaQuery, MediaStore};
use media_harvester::{IngestPipeline, MediaKind};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestHarvester".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    }
}

fn worker(batch_size: usize, fetch_timeout_ms: u64) -> WorkerConfig {
    WorkerConfig {
        batch_size,
        fetch_timeout_ms,
    }
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn wait_idle(pipeline: &IngestPipeline) {
    tokio::time::timeout(Duration::from_secs(30), pipeline.wait_until_idle())
        .await
        .expect("Pipeline did not drain in time");
}

#[tokio::test]
async fn test_pages_are_harvested_into_database() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/gallery",
        r#"<html><body>
            <h1>Gallery</h1>
            <img src="https://cdn.example.com/a.jpg">
            <img src="/thumbs/a.jpg">
            <img src="https://cdn.example.com/b.jpg">
            <video controls>
                <source src="https://cdn.example.com/clip.webm" type="video/webm">
                <source src="https://cdn.example.com/clip.mp4" type="video/mp4">
            </video>
        </body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/about", "<p>Nothing to see</p>").await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("media.db");
    let database = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
    };
    let store: Arc<dyn MediaStore> = Arc::new(open_storage(&database).unwrap());

    let pipeline = IngestPipeline::new(&worker(20, 5000), &test_user_agent(), Arc::clone(&store))
        .expect("Failed to build pipeline");

    let gallery = format!("{}/gallery", base_url);
    let queue_length = pipeline.submit(vec![
        gallery.clone(),
        format!("{}/about", base_url),
        format!("{}/missing", base_url),
    ]);
    assert_eq!(queue_length, 3);

    wait_idle(&pipeline).await;

    assert_eq!(store.count_total().unwrap(), 4);
    assert_eq!(store.count_by_kind(MediaKind::Image).unwrap(), 2);
    assert_eq!(store.count_by_kind(MediaKind::Video).unwrap(), 2);

    let page = store.query_media(&MediaQuery::default()).unwrap();
    assert!(page.records.iter().all(|r| r.original_url == gallery));
    assert!(page.records.windows(2).all(|w| w[0].id > w[1].id));

    // Data survives reopening the file
    drop(pipeline);
    drop(store);
    let reopened = open_storage(&database).unwrap();
    assert_eq!(reopened.count_total().unwrap(), 4);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header_regex("user-agent", r"TestHarvester/1\.0\.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<img src="https://x/y.png">"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store: Arc<dyn MediaStore> = Arc::new(
        open_storage(&DatabaseConfig {
            url: ":memory:".to_string(),
        })
        .unwrap(),
    );
    let pipeline =
        IngestPipeline::new(&worker(20, 5000), &test_user_agent(), Arc::clone(&store)).unwrap();

    pipeline.submit(vec![format!("{}/page", mock_server.uri())]);
    wait_idle(&pipeline).await;

    assert_eq!(store.count_total().unwrap(), 1);
}

#[tokio::test]
async fn test_large_backlog_drains_across_cycles() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/item",
        r#"<img src="https://cdn.example.com/1.png"><img src="https://cdn.example.com/2.png">"#,
    )
    .await;

    let store: Arc<dyn MediaStore> = Arc::new(
        open_storage(&DatabaseConfig {
            url: ":memory:".to_string(),
        })
        .unwrap(),
    );
    let pipeline =
        IngestPipeline::new(&worker(7, 5000), &test_user_agent(), Arc::clone(&store)).unwrap();

    let urls: Vec<String> = (0..50)
        .map(|i| format!("{}/item?n={}", mock_server.uri(), i))
        .collect();
    pipeline.submit(urls);
    wait_idle(&pipeline).await;

    let stats = pipeline.stats();
    assert_eq!(stats.cycles_completed, 8);
    assert_eq!(stats.urls_processed, 50);
    assert_eq!(stats.media_written, 100);
    assert_eq!(stats.max_concurrent_cycles, 1);
    assert_eq!(store.count_total().unwrap(), 100);
}

#[tokio::test]
async fn test_unreachable_and_slow_pages_are_skipped() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/ok", r#"<img src="https://cdn.example.com/ok.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/stall"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<img src="https://cdn.example.com/late.png">"#)
                .set_delay(Duration::from_secs(20)),
        )
        .mount(&mock_server)
        .await;

    let store: Arc<dyn MediaStore> = Arc::new(
        open_storage(&DatabaseConfig {
            url: ":memory:".to_string(),
        })
        .unwrap(),
    );
    let pipeline =
        IngestPipeline::new(&worker(20, 500), &test_user_agent(), Arc::clone(&store)).unwrap();

    pipeline.submit(vec![
        format!("{}/stall", mock_server.uri()),
        "ftp://example.com/file".to_string(),
        "http://127.0.0.1:9/".to_string(),
        format!("{}/ok", mock_server.uri()),
    ]);
    wait_idle(&pipeline).await;

    let stats = pipeline.stats();
    assert_eq!(stats.urls_processed, 1);
    assert_eq!(stats.fetch_failures, 3);

    let page = store.query_media(&MediaQuery::default()).unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].media_url, "https://cdn.example.com/ok.png");
}
