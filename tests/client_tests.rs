mod common;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::{backend_router, catalog_router, spawn_backend};
use keystats::client::{ApiClient, Dataset, FetchState};
use keystats::config::ClientSettings;
use keystats::error::StatsError;
use keystats::models::MetricField;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn settings_for(api_url: &str) -> ClientSettings {
    ClientSettings {
        api_url: api_url.to_string(),
        timeout_secs: 5,
        retry_base_ms: 1,
        retry_max_ms: 5,
        ..Default::default()
    }
}

#[test]
fn test_unfetched_dataset_is_loading_without_errors() {
    let dataset = Dataset::default();
    assert_eq!(dataset.metrics, FetchState::Loading);
    assert!(dataset.errors().is_empty());
    assert!(dataset.metrics().is_empty());
    assert_eq!(dataset.corpus_name(1), None);
}

#[tokio::test]
async fn test_fetch_dataset_loads_every_resource() {
    let url = spawn_backend(backend_router()).await;
    let client = ApiClient::new(&settings_for(&url)).unwrap();

    let dataset = client.fetch_dataset().await;

    assert!(dataset.errors().is_empty());
    assert_eq!(dataset.corpora.items().len(), 3);
    // Served as a paginated envelope
    assert_eq!(dataset.keyboards.items().len(), 3);
    assert_eq!(dataset.layouts.items().len(), 3);
    assert_eq!(dataset.metrics().len(), 5);

    assert_eq!(dataset.corpus_name(1), Some("English prose"));
    assert_eq!(dataset.keyboard_name(3), Some("Corne"));
    assert_eq!(dataset.layout_name(3), Some("Йцукен"));
    assert_eq!(dataset.layout_name(42), None);

    let preview = dataset.preview_for(1, 1).expect("preview for qwerty on ANSI");
    assert_eq!(preview.layout_preview.as_deref(), Some("/media/q.svg"));
    assert!(dataset.preview_for(2, 1).is_none());

    let colemak = dataset.metrics().iter().find(|m| m.id == 2).unwrap();
    assert_eq!(colemak.value(MetricField::Sfb), Some(0.1285));
    assert_eq!(colemak.value(MetricField::Redirect), None);
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_tolerated() {
    let url = spawn_backend(backend_router()).await;
    let client = ApiClient::new(&settings_for(&format!("{}/", url))).unwrap();

    assert_eq!(client.base_url(), url);
    assert_eq!(client.corpora().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_resource_does_not_block_the_others() {
    let app = catalog_router().route(
        "/api/metrics/",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let url = spawn_backend(app).await;
    let client = ApiClient::new(&settings_for(&url)).unwrap();

    let dataset = client.fetch_dataset().await;

    assert_eq!(
        dataset.metrics,
        FetchState::Failed("Error loading metrics".to_string())
    );
    assert!(dataset.metrics().is_empty());
    assert_eq!(dataset.errors(), vec!["Error loading metrics"]);
    assert_eq!(dataset.corpora.items().len(), 3);
    assert_eq!(dataset.keyboards.items().len(), 3);
}

#[tokio::test]
async fn test_single_record_endpoints() {
    let url = spawn_backend(backend_router()).await;
    let client = ApiClient::new(&settings_for(&url)).unwrap();

    let metric = client.metric(4).await.unwrap();
    assert_eq!((metric.corpus, metric.keyboard, metric.layout), (2, 2, 3));
    assert_eq!(metric.layout_name, "Йцукен");

    let keyboard = client.keyboard(2).await.unwrap();
    assert_eq!(keyboard.name, "Keyboard 2");
    assert_eq!(keyboard.keys, None);

    let layout = client.layout(3).await.unwrap();
    assert_eq!(layout.name, "Layout 3");
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let url = spawn_backend(backend_router()).await;
    let client = ApiClient::new(&settings_for(&url)).unwrap();

    let err = client.metric(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_transient());

    let err = client.keyboard(7).await.unwrap_err();
    assert!(matches!(err, StatsError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_payload_is_a_decode_error() {
    let app = Router::new().route(
        "/api/corpora/",
        get(|| async { Json(json!({ "detail": "not a list" })) }),
    );
    let url = spawn_backend(app).await;
    let client = ApiClient::new(&settings_for(&url)).unwrap();

    let err = client.corpora().await.unwrap_err();
    assert!(matches!(err, StatsError::Decode { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_transient_status_is_retried_when_enabled() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/api/corpora/",
        get(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(StatusCode::SERVICE_UNAVAILABLE)
                } else {
                    Ok(Json(json!([{ "id": 1, "name": "Late corpus" }])))
                }
            }
        }),
    );
    let url = spawn_backend(app).await;

    let client = ApiClient::new(&ClientSettings {
        max_retries: 3,
        ..settings_for(&url)
    })
    .unwrap();

    let corpora = client.corpora().await.unwrap();
    assert_eq!(corpora[0].name, "Late corpus");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_retries_by_default() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/api/corpora/",
        get(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { StatusCode::SERVICE_UNAVAILABLE }
        }),
    );
    let url = spawn_backend(app).await;
    let client = ApiClient::new(&settings_for(&url)).unwrap();

    let err = client.corpora().await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_backend_fails_every_resource() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ApiClient::new(&settings_for(&format!("http://127.0.0.1:{}/api", port))).unwrap();
    let dataset = client.fetch_dataset().await;

    assert_eq!(dataset.errors().len(), 5);
    assert_eq!(
        dataset.previews.error(),
        Some("Error loading layout previews")
    );
}

#[test]
fn test_client_rejects_non_http_url() {
    let err = ApiClient::new(&settings_for("ftp://example.com/api")).err().unwrap();
    assert!(matches!(err, StatsError::Url(_)));
}
