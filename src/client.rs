use crate::config::ClientSettings;
use crate::error::{StatsError, StatsResult};
use crate::models::{Corpus, Id, Keyboard, Layout, LayoutPreview, ListPayload, Metric};
use crate::pipeline;
use crate::retry::{retry_transient, RetryPolicy};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Outcome of one backend fetch as the presentation layer sees it.
///
/// Commands await every fetch before rendering, so `Loading` only shows up in
/// a `Dataset` that has not been fetched yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Loading,
    Ready(T),
    /// Generic user-facing message. The underlying error is logged, not kept.
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn from_result(resource: &str, result: StatsResult<T>) -> Self {
        match result {
            Ok(data) => FetchState::Ready(data),
            Err(e) => {
                warn!("❌ Failed to load {}: {}", resource, e);
                FetchState::Failed(format!("Error loading {}", resource))
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> FetchState<Vec<T>> {
    /// Loaded items, or an empty slice while loading or after a failure.
    pub fn items(&self) -> &[T] {
        self.data().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Everything a page needs, fetched together.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub corpora: FetchState<Vec<Corpus>>,
    pub keyboards: FetchState<Vec<Keyboard>>,
    pub layouts: FetchState<Vec<Layout>>,
    pub previews: FetchState<Vec<LayoutPreview>>,
    pub metrics: FetchState<Vec<Metric>>,
}

impl Dataset {
    pub fn metrics(&self) -> &[Metric] {
        self.metrics.items()
    }

    pub fn errors(&self) -> Vec<&str> {
        [
            self.corpora.error(),
            self.keyboards.error(),
            self.layouts.error(),
            self.previews.error(),
            self.metrics.error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn corpus_name(&self, id: Id) -> Option<&str> {
        self.corpora
            .items()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn keyboard_name(&self, id: Id) -> Option<&str> {
        self.keyboards
            .items()
            .iter()
            .find(|k| k.id == id)
            .map(|k| k.name.as_str())
    }

    pub fn layout_name(&self, id: Id) -> Option<&str> {
        self.layouts
            .items()
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.as_str())
    }

    pub fn preview_for(&self, keyboard: Id, layout: Id) -> Option<&LayoutPreview> {
        self.previews
            .items()
            .iter()
            .find(|p| p.keyboard == keyboard && p.layout == layout)
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(settings: &ClientSettings) -> StatsResult<Self> {
        settings.validate()?;
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(StatsError::Transport)?;

        Ok(Self {
            client,
            base_url: settings.base_url().to_string(),
            retry: RetryPolicy::from(settings),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> StatsResult<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(StatsError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<T>().await.map_err(|source| StatsError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StatsResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let url = url.as_str();
        retry_transient(&self.retry, url, move || self.get_once(url)).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> StatsResult<Vec<T>> {
        self.get_json::<ListPayload<T>>(path)
            .await
            .map(ListPayload::into_vec)
    }

    pub async fn corpora(&self) -> StatsResult<Vec<Corpus>> {
        self.get_list("corpora/").await
    }

    pub async fn keyboards(&self) -> StatsResult<Vec<Keyboard>> {
        self.get_list("keyboards/").await
    }

    pub async fn keyboard(&self, id: Id) -> StatsResult<Keyboard> {
        self.get_json(&format!("keyboards/{}/", id)).await
    }

    pub async fn layouts(&self) -> StatsResult<Vec<Layout>> {
        self.get_list("layouts/").await
    }

    pub async fn layout(&self, id: Id) -> StatsResult<Layout> {
        self.get_json(&format!("layouts/{}/", id)).await
    }

    pub async fn layout_previews(&self) -> StatsResult<Vec<LayoutPreview>> {
        self.get_list("layout-previews/").await
    }

    pub async fn metrics(&self) -> StatsResult<Vec<Metric>> {
        self.get_list("metrics/").await
    }

    pub async fn metric(&self, id: Id) -> StatsResult<Metric> {
        self.get_json(&format!("metrics/{}/", id)).await
    }

    /// Fans out every list request and waits for all of them.
    ///
    /// A failed request only marks its own resource as failed.
    pub async fn fetch_dataset(&self) -> Dataset {
        info!("📡 Fetching dataset from {}", self.base_url);
        let (corpora, keyboards, layouts, previews, metrics) = tokio::join!(
            self.corpora(),
            self.keyboards(),
            self.layouts(),
            self.layout_previews(),
            self.metrics(),
        );

        if let Ok(list) = &metrics {
            let dupes = pipeline::duplicate_triples(list);
            if !dupes.is_empty() {
                warn!(
                    "⚠️  {} duplicate (corpus, keyboard, layout) triples; first match wins: {:?}",
                    dupes.len(),
                    dupes
                );
            }
        }

        let dataset = Dataset {
            corpora: FetchState::from_result("corpora", corpora),
            keyboards: FetchState::from_result("keyboards", keyboards),
            layouts: FetchState::from_result("layouts", layouts),
            previews: FetchState::from_result("layout previews", previews),
            metrics: FetchState::from_result("metrics", metrics),
        };
        info!(
            "📦 Loaded {} metrics, {} corpora, {} keyboards, {} layouts",
            dataset.metrics().len(),
            dataset.corpora.items().len(),
            dataset.keyboards.items().len(),
            dataset.layouts.items().len()
        );
        dataset
    }
}
