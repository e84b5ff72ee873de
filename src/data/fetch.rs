//! Full-page fetching for review links.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{
    config::Settings,
    data::{
        extract::extract_text,
        outcome::{FailureKind, Fetched, Unavailable},
    },
};

/// Browser-like agent; many review sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";

/// Bodies at or below this many bytes are treated as empty pages.
pub const MIN_BODY_LEN: usize = 100;

/// Anything that can turn a URL into extracted page text.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Fetched<String>;
}

/// HTTP implementation of [`PageSource`].
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    char_cap: usize,
}

impl PageFetcher {
    pub fn new(timeout: Duration, char_cap: usize) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client, char_cap })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(settings.fetch_timeout, settings.page_char_cap)
    }

    async fn try_fetch(&self, url: &str) -> Result<String, Unavailable> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Unavailable::from_reqwest)?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Unavailable::new(
                FailureKind::Status(status.as_u16()),
                format!("GET {url} returned {status}"),
            ));
        }
        let body = resp.text().await.map_err(Unavailable::from_reqwest)?;
        let body_chars = body.chars().count();
        if body_chars <= MIN_BODY_LEN {
            return Err(Unavailable::new(
                FailureKind::TooShort,
                format!("{body_chars} chars"),
            ));
        }
        let text = extract_text(&body, self.char_cap);
        if text.is_empty() {
            return Err(Unavailable::new(FailureKind::TooShort, "no visible text"));
        }
        Ok(text)
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_text(&self, url: &str) -> Fetched<String> {
        let fetched: Fetched<String> = self.try_fetch(url).await.into();
        match &fetched {
            Fetched::Content(text) => debug!(%url, chars = text.chars().count(), "fetched page"),
            Fetched::Unavailable(why) => debug!(%url, %why, "page unavailable"),
        }
        fetched
    }
}
