//! Web review aggregation over the Serper search API.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::{
    future::join_all,
    stream::{self, StreamExt},
};
use indexmap::IndexMap;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Settings,
    data::{
        fetch::{PageFetcher, PageSource},
        outcome::{FailureKind, Fetched, Unavailable},
    },
    model::Source,
};

const SERPER_URL: &str = "https://google.serper.dev/search";

/// Separator placed between collected text entries.
pub const TEXT_DELIMITER: &str = "\n\n";

/// One organic search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// Search engine seam used by the aggregator.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, num: usize) -> Fetched<Vec<SearchHit>>;
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

/// Serper (Google Search) client.
#[derive(Debug, Clone)]
pub struct SerperClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl SerperClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self {
            api_key,
            base_url: SERPER_URL.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn try_search(&self, api_key: &str, query: &str, num: usize) -> Result<Vec<SearchHit>, Unavailable> {
        let body = serde_json::json!({ "q": query, "num": num });
        let resp = self
            .client
            .post(&self.base_url)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Unavailable::from_reqwest)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Unavailable::new(
                FailureKind::Status(status.as_u16()),
                format!("serper returned {status}"),
            ));
        }
        let payload: SerperResponse = resp.json().await.map_err(Unavailable::from_reqwest)?;
        Ok(payload.organic)
    }
}

#[async_trait]
impl SearchBackend for SerperClient {
    async fn search(&self, query: &str, num: usize) -> Fetched<Vec<SearchHit>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Fetched::unavailable(FailureKind::NotConfigured, "SERPER_API_KEY is not set");
        };
        info!(query, num, "serper search");
        self.try_search(api_key, query, num).await.into()
    }
}

/// Queries issued for every wine, in the order results are merged.
pub fn review_queries(wine: &str) -> Vec<String> {
    vec![
        format!("{wine} tasting notes cellartracker"),
        format!("{wine} tasting notes vivino"),
        format!("{wine} tasting notes review"),
        format!("{wine} site:decanter.com tasting notes"),
        format!("{wine} barnyard brett funky earthy tasting notes"),
        format!("{wine} avis degustation notes dégustation"),
    ]
}

/// Text gathered from the web for one wine, with the pages it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebReviews {
    /// Snippets and page excerpts in discovery order.
    pub entries: Vec<String>,
    /// One citation per unique link that contributed an entry.
    pub sources: Vec<Source>,
}

impl WebReviews {
    /// Entries joined with [`TEXT_DELIMITER`].
    pub fn text(&self) -> String {
        self.entries.join(TEXT_DELIMITER)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tunables for [`WebReviewAggregator`].
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    pub results_per_query: usize,
    pub fetch_concurrency: usize,
    pub denylist: Vec<String>,
}

impl AggregatorOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            results_per_query: settings.results_per_query,
            fetch_concurrency: settings.fetch_concurrency.max(1),
            denylist: settings.fetch_denylist.clone(),
        }
    }

    /// Whether `link` belongs to a site that blocks automated fetches.
    pub fn is_denied(&self, link: &str) -> bool {
        self.denylist.iter().any(|blocked| link.contains(blocked.as_str()))
    }
}

/// Runs the review queries and merges their results.
#[derive(Clone)]
pub struct WebReviewAggregator {
    search: Arc<dyn SearchBackend>,
    pages: Arc<dyn PageSource>,
    options: AggregatorOptions,
}

impl WebReviewAggregator {
    pub fn new(
        search: Arc<dyn SearchBackend>,
        pages: Arc<dyn PageSource>,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            search,
            pages,
            options,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let search = SerperClient::new(settings.serper_api_key.clone(), settings.fetch_timeout)?;
        let pages = PageFetcher::from_settings(settings)?;
        Ok(Self::new(
            Arc::new(search),
            Arc::new(pages),
            AggregatorOptions::from_settings(settings),
        ))
    }

    /// Search, deduplicate and collect review text for `wine`.
    ///
    /// Queries and page fetches run concurrently, but results are merged in
    /// query order then result order, so the output matches a sequential run.
    #[instrument(skip(self))]
    pub async fn gather(&self, wine: &str) -> WebReviews {
        let queries = review_queries(wine);
        let num = self.options.results_per_query;
        let responses = join_all(queries.iter().map(|q| self.search.search(q, num))).await;

        let mut unique: IndexMap<String, SearchHit> = IndexMap::new();
        for (query, response) in queries.iter().zip(responses) {
            match response {
                Fetched::Content(hits) => {
                    debug!(%query, count = hits.len(), "search results");
                    for hit in hits {
                        if hit.link.is_empty() || unique.contains_key(&hit.link) {
                            continue;
                        }
                        unique.insert(hit.link.clone(), hit);
                    }
                }
                Fetched::Unavailable(why) => warn!(%query, %why, "search unavailable"),
            }
        }

        let links: Vec<String> = unique.keys().cloned().collect();
        let pages: Vec<Option<String>> = stream::iter(links)
            .map(|link| async move {
                if self.options.is_denied(&link) {
                    return None;
                }
                self.pages.fetch_text(&link).await.content()
            })
            .buffered(self.options.fetch_concurrency.max(1))
            .collect()
            .await;

        let mut reviews = WebReviews::default();
        for (hit, page) in unique.into_values().zip(pages) {
            let before = reviews.entries.len();
            if !hit.snippet.trim().is_empty() {
                reviews.entries.push(hit.snippet);
            }
            if let Some(text) = page {
                reviews.entries.push(text);
            }
            if reviews.entries.len() > before {
                let title = if hit.title.trim().is_empty() {
                    "Unknown".to_string()
                } else {
                    hit.title
                };
                reviews.sources.push(Source {
                    title,
                    link: hit.link,
                });
            }
        }
        info!(
            wine,
            entries = reviews.entries.len(),
            sources = reviews.sources.len(),
            "gathered web reviews"
        );
        reviews
    }
}
