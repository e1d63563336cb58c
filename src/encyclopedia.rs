//! Wikipedia client for page summaries and page images
//!
//! Only fetching lives here. Missing pages and transport failures come
//! back as errors; turning them into placeholder text is the explorer's job.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::config::EncyclopediaConfig;
use crate::{ExplorerError, Result};

/// Source of page summaries, looked up by title
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Plain-text extract of the page. Never returns an empty string.
    async fn fetch_summary(&self, title: &str) -> Result<String>;
}

/// Source of page thumbnails, looked up by title
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// URL of the page's thumbnail image
    async fn fetch_thumbnail(&self, title: &str) -> Result<String>;
}

/// HTTP client for the Wikipedia REST and action APIs
pub struct WikipediaClient {
    client: Client,
    rest_base_url: String,
    api_base_url: String,
    thumbnail_size: u32,
}

impl WikipediaClient {
    /// Create a new client
    pub fn new(config: &EncyclopediaConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            rest_base_url: config.rest_base_url.trim_end_matches('/').to_string(),
            api_base_url: config.api_base_url.clone(),
            thumbnail_size: config.thumbnail_size,
        })
    }

    fn summary_url(&self, title: &str) -> String {
        format!(
            "{}/page/summary/{}",
            self.rest_base_url,
            urlencoding::encode(title)
        )
    }

    fn thumbnail_url(&self, title: &str) -> String {
        format!(
            "{}?action=query&prop=pageimages&format=json&titles={}&pithumbsize={}",
            self.api_base_url,
            urlencoding::encode(title),
            self.thumbnail_size
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Wikipedia request failed: {}", e);
            ExplorerError::network(format!("Wikipedia request failed: {e}"))
        })?;

        let status = response.status();
        debug!(
            "Wikipedia responded {} in {:.3}s",
            status,
            start.elapsed().as_secs_f64()
        );

        if status != StatusCode::OK {
            return Err(ExplorerError::network(format!(
                "Wikipedia returned HTTP {status}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl SummarySource for WikipediaClient {
    #[instrument(skip(self))]
    async fn fetch_summary(&self, title: &str) -> Result<String> {
        let response = self.get(&self.summary_url(title)).await?;
        let summary: wikipedia::SummaryResponse = response.json().await.map_err(|e| {
            ExplorerError::network(format!("Invalid summary data for '{title}': {e}"))
        })?;

        summary.into_extract().ok_or_else(|| {
            debug!("No extract for '{}'", title);
            ExplorerError::not_found(format!("No summary for '{title}'"))
        })
    }
}

#[async_trait]
impl ImageSource for WikipediaClient {
    #[instrument(skip(self))]
    async fn fetch_thumbnail(&self, title: &str) -> Result<String> {
        let response = self.get(&self.thumbnail_url(title)).await?;
        let images: wikipedia::PageImagesResponse = response.json().await.map_err(|e| {
            ExplorerError::network(format!("Invalid page image data for '{title}': {e}"))
        })?;

        images
            .into_thumbnail()
            .ok_or_else(|| ExplorerError::not_found(format!("No image for '{title}'")))
    }
}

/// Wikipedia API response structures
mod wikipedia {
    use super::HashMap;
    use serde::Deserialize;

    /// `GET /page/summary/{title}`
    #[derive(Debug, Deserialize)]
    pub struct SummaryResponse {
        pub extract: Option<String>,
    }

    impl SummaryResponse {
        pub fn into_extract(self) -> Option<String> {
            self.extract.filter(|text| !text.trim().is_empty())
        }
    }

    /// `action=query&prop=pageimages`
    #[derive(Debug, Deserialize)]
    pub struct PageImagesResponse {
        pub query: Option<Query>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Query {
        #[serde(default)]
        pub pages: HashMap<String, Page>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Page {
        pub thumbnail: Option<Thumbnail>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Thumbnail {
        pub source: String,
    }

    impl PageImagesResponse {
        /// Thumbnail of the first page; a single title yields a single page
        pub fn into_thumbnail(self) -> Option<String> {
            self.query?
                .pages
                .into_values()
                .next()?
                .thumbnail
                .map(|thumbnail| thumbnail.source)
        }
    }
}
