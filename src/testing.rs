//! In-memory stand-ins for the external services, for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::encyclopedia::{ImageSource, SummarySource};
use crate::geocoding::ReverseGeocoder;
use crate::models::Coordinates;
use crate::{ExplorerError, Result};

enum Page {
    Summary(String),
    NetworkFailure,
}

/// Encyclopedia answering from a fixed set of pages. Unknown titles are
/// reported as not found. Every requested title is recorded.
#[derive(Default)]
pub struct FakeEncyclopedia {
    pages: HashMap<String, Page>,
    thumbnails: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FakeEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, title: &str, text: &str) -> Self {
        self.pages
            .insert(title.to_string(), Page::Summary(text.to_string()));
        self
    }

    pub fn with_network_failure(mut self, title: &str) -> Self {
        self.pages.insert(title.to_string(), Page::NetworkFailure);
        self
    }

    pub fn with_thumbnail(mut self, title: &str, url: &str) -> Self {
        self.thumbnails.insert(title.to_string(), url.to_string());
        self
    }

    /// Summary titles requested so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummarySource for FakeEncyclopedia {
    async fn fetch_summary(&self, title: &str) -> Result<String> {
        self.requested.lock().unwrap().push(title.to_string());
        match self.pages.get(title) {
            Some(Page::Summary(text)) if !text.is_empty() => Ok(text.clone()),
            Some(Page::NetworkFailure) => Err(ExplorerError::network("connection reset")),
            _ => Err(ExplorerError::not_found(title)),
        }
    }
}

#[async_trait]
impl ImageSource for FakeEncyclopedia {
    async fn fetch_thumbnail(&self, title: &str) -> Result<String> {
        self.thumbnails
            .get(title)
            .cloned()
            .ok_or_else(|| ExplorerError::not_found(title))
    }
}

/// Geocoder that always answers with the same name, or always fails
pub struct FakeGeocoder(pub Option<String>);

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<String> {
        self.0
            .clone()
            .ok_or_else(|| ExplorerError::network("geocoder unreachable"))
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
