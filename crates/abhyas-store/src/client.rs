//! Content-store HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use abhyas_core::{
    defaults, ArticleSummary, CategoryFamily, CategoryId, ContentStore, Error, KeywordMatch,
    MapsPayload, NoteSummary, ReferenceDeck, Result, TimelineEvent, TimelineKind,
};

use crate::types::StoreErrorResponse;

/// Default content-store endpoint (local development).
pub const DEFAULT_STORE_URL: &str = "http://localhost:8080/v1";

/// Configuration for the content-store client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL for the store API.
    pub base_url: String,
    /// Bearer credential (optional for local endpoints).
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            api_key: None,
            timeout_seconds: defaults::STORE_TIMEOUT_SECS,
        }
    }
}

/// HTTP implementation of [`ContentStore`].
pub struct ContentClient {
    client: Client,
    config: StoreConfig,
}

impl ContentClient {
    /// Create a new client with the given configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Store(format!("Failed to create HTTP client: {}", e)))?;

        info!(base_url = %config.base_url, "Initializing content-store client");

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `CONTENT_STORE_URL` | `http://localhost:8080/v1` | Base API URL |
    /// | `CONTENT_STORE_API_KEY` | unset | Bearer credential |
    /// | `CONTENT_STORE_TIMEOUT` | `30` | Request timeout (seconds) |
    pub fn from_env() -> Result<Self> {
        let config = StoreConfig {
            base_url: std::env::var("CONTENT_STORE_URL")
                .unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
            api_key: std::env::var("CONTENT_STORE_API_KEY").ok(),
            timeout_seconds: std::env::var("CONTENT_STORE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::STORE_TIMEOUT_SECS),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Issue a GET and decode the JSON body into `T`.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, "Content-store request");

        let mut req = self.client.get(&url);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Store(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: StoreErrorResponse = response
                .json()
                .await
                .unwrap_or_else(|_| StoreErrorResponse::unknown());
            return Err(Error::Store(format!(
                "Store returned {}: {}",
                status, body.error.message
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Store(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ContentStore for ContentClient {
    async fn fetch_category(&self, category: CategoryId) -> Result<ReferenceDeck> {
        if category.family() != CategoryFamily::Reference {
            return Err(Error::InvalidInput(format!(
                "{} is not a reference-family category",
                category
            )));
        }
        self.get_json(&format!("/categories/{}", category)).await
    }

    async fn fetch_timeline(&self, kind: TimelineKind) -> Result<Vec<TimelineEvent>> {
        self.get_json(&format!("/timelines/{}", kind)).await
    }

    async fn fetch_maps(&self) -> Result<MapsPayload> {
        self.get_json("/maps").await
    }

    async fn fetch_recent_notes(&self, limit: usize) -> Result<Vec<NoteSummary>> {
        self.get_json(&format!("/notes/recent?limit={}", limit)).await
    }

    async fn fetch_recent_articles(&self, limit: usize) -> Result<Vec<ArticleSummary>> {
        self.get_json(&format!("/articles/recent?limit={}", limit))
            .await
    }

    async fn fetch_keyword_matches(&self) -> Result<Vec<KeywordMatch>> {
        self.get_json("/matches/keywords").await
    }
}
