//! Best-effort retrieval of an article's full text.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use wa_core::{Error, Result};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Container holding the article body on the publishing platform.
pub const CONTENT_SELECTOR: &str = "div.rich_media_content";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Full text behind `reference`, or the empty string on any failure.
    async fn fetch(&self, reference: &str) -> String;
}

/// Text of the first element matching `css`, with each text node trimmed
/// and the pieces concatenated.
pub fn extract_container(html: &str, css: &str) -> Result<String> {
    let selector = Selector::parse(css)
        .map_err(|e| Error::Fetch(format!("Invalid selector: {:?}", e)))?;
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .next()
        .map(|el| el.text().map(str::trim).collect::<String>())
        .ok_or_else(|| Error::Fetch(format!("No element found for selector: {}", css)))
}

#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    client: reqwest::Client,
    selector: String,
}

impl HttpContentFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            selector: CONTENT_SELECTOR.to_string(),
        })
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    async fn try_fetch(&self, reference: &str) -> Result<String> {
        let url = Url::parse(reference)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", reference, e)))?;
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_container(&html, &self.selector)
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, reference: &str) -> String {
        match self.try_fetch(reference).await {
            Ok(text) => {
                debug!(reference, length = text.chars().count(), "Fetched article content");
                text
            }
            Err(e) => {
                warn!(reference, error = %e, "Failed to fetch article content");
                String::new()
            }
        }
    }
}
