#![allow(dead_code)] // Not every test binary uses every helper

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use keystats::models::{Id, Metric, MetricField};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Builder for Metric records with readable names.
pub struct MetricBuilder {
    metric: Metric,
}

impl MetricBuilder {
    pub fn new(id: Id, corpus: Id, keyboard: Id, layout: Id) -> Self {
        let mut metric = Metric::new(id, corpus, keyboard, layout);
        metric.corpus_name = format!("corpus-{}", corpus);
        metric.keyboard_name = format!("keyboard-{}", keyboard);
        metric.layout_name = format!("layout-{}", layout);
        Self { metric }
    }

    pub fn named(mut self, layout_name: &str) -> Self {
        self.metric.layout_name = layout_name.to_string();
        self
    }

    pub fn with(mut self, field: MetricField, value: f64) -> Self {
        self.metric.set(field, Some(value));
        self
    }

    /// Even split: each finger carries 10%.
    pub fn balanced_hands(mut self) -> Self {
        for field in MetricField::in_group(keystats::models::MetricGroup::FingerUsage) {
            self.metric.set(field, Some(0.1));
        }
        self
    }

    pub fn build(self) -> Metric {
        self.metric
    }
}

/// Small dataset shared by the pipeline, selection and CLI tests.
///
/// corpus 1: keyboard 1 -> layouts {1, 2}; keyboard 2 -> layout {1}
/// corpus 2: keyboard 2 -> layout {3}; keyboard 3 -> layout {3}
pub fn sample_metrics() -> Vec<Metric> {
    vec![
        MetricBuilder::new(1, 1, 1, 1)
            .named("Qwerty")
            .balanced_hands()
            .with(MetricField::Sfb, 0.0858)
            .with(MetricField::RollIn, 0.21)
            .with(MetricField::TotalTravel, 0.858)
            .build(),
        MetricBuilder::new(2, 1, 1, 2)
            .named("Colemak")
            .with(MetricField::LeftIndexUsage, 0.3)
            .with(MetricField::RightIndexUsage, 0.1)
            .with(MetricField::Sfb, 0.1285)
            .with(MetricField::RollIn, 0.25)
            .with(MetricField::TotalTravel, 1.28)
            .build(),
        MetricBuilder::new(3, 1, 2, 1)
            .named("Qwerty")
            .with(MetricField::Sfb, 0.07)
            .build(),
        MetricBuilder::new(4, 2, 2, 3)
            .named("Йцукен")
            .with(MetricField::Sfb, 0.05)
            .build(),
        MetricBuilder::new(5, 2, 3, 3)
            .named("Йцукен")
            .build(),
    ]
}

fn metrics_json() -> Value {
    serde_json::to_value(sample_metrics()).expect("sample metrics serialize")
}

/// A backend that answers every endpoint the client uses.
pub fn backend_router() -> Router {
    catalog_router().route("/api/metrics/", get(|| async { Json(metrics_json()) }))
}

/// Every endpoint except the metrics list, so tests can plug in their own.
pub fn catalog_router() -> Router {
    Router::new()
        .route(
            "/api/corpora/",
            get(|| async {
                Json(json!([
                    { "id": 1, "name": "English prose", "language": "en", "unique_symbols": 64, "size": 1200000 },
                    { "id": 2, "name": "Russian news", "language": "ru" },
                    // Listed by the backend but never measured
                    { "id": 3, "name": "German wiki", "language": "de" }
                ]))
            }),
        )
        .route(
            "/api/keyboards/",
            get(|| async {
                // Paginated envelope on purpose
                Json(json!({
                    "count": 3,
                    "next": null,
                    "results": [
                        { "id": 1, "name": "ANSI 60%", "form_factor": "ANSI", "keys": 61, "rows": 5 },
                        { "id": 2, "name": "ISO 60%", "form_factor": "ISO", "keys": 62, "rows": 5 },
                        { "id": 3, "name": "Corne", "form_factor": "Matrix", "keys": 42, "rows": 4 }
                    ]
                }))
            }),
        )
        .route(
            "/api/keyboards/{id}/",
            get(|Path(id): Path<u32>| async move {
                if id > 3 {
                    return Err(StatusCode::NOT_FOUND);
                }
                Ok(Json(json!({ "id": id, "name": format!("Keyboard {}", id), "form_factor": "ANSI" })))
            }),
        )
        .route(
            "/api/layouts/",
            get(|| async {
                Json(json!([
                    { "id": 1, "name": "Qwerty", "language": "en" },
                    { "id": 2, "name": "Colemak", "language": "en" },
                    { "id": 3, "name": "Йцукен", "language": "ru", "layout_model": { "rows": [] } }
                ]))
            }),
        )
        .route(
            "/api/layouts/{id}/",
            get(|Path(id): Path<u32>| async move {
                Json(json!({ "id": id, "name": format!("Layout {}", id), "language": "en" }))
            }),
        )
        .route(
            "/api/layout-previews/",
            get(|| async {
                Json(json!([{ "id": 1, "keyboard": 1, "layout": 1, "layout_preview": "/media/q.svg" }]))
            }),
        )
        .route(
            "/api/metrics/{id}/",
            get(|Path(id): Path<u32>| async move {
                sample_metrics()
                    .into_iter()
                    .find(|m| m.id == id)
                    .map(Json)
                    .ok_or(StatusCode::NOT_FOUND)
            }),
        )
}

/// Serves `app` on an ephemeral port and returns the API base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}/api", port)
}
