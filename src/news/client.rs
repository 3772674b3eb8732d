use crate::config::Config;
use crate::error::{Error, Result};
use crate::news::{Article, HeadlinesResponse, SourceDto, SourcesResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const TOP_HEADLINES_PATH: &str = "/v2/top-headlines";
pub const SOURCES_PATH: &str = "/v2/top-headlines/sources";

/// Request parameters for a top-headlines fetch.
///
/// When `sources` is non-empty, `country` and `category` are omitted from the
/// request entirely: the API rejects requests that combine them.
#[derive(Debug, Clone, Default)]
pub struct HeadlinesQuery {
    pub country: Option<String>,
    pub category: Option<String>,
    pub sources: Vec<String>,
    pub page_size: usize,
}

impl HeadlinesQuery {
    pub fn for_country(country: Option<String>, category: Option<String>, page_size: usize) -> Self {
        Self {
            country,
            category,
            sources: Vec::new(),
            page_size,
        }
    }

    pub fn for_sources(sources: Vec<String>, page_size: usize) -> Self {
        Self {
            country: None,
            category: None,
            sources,
            page_size,
        }
    }
}

/// Transport seam for the remote news API.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<Vec<Article>>;

    async fn sources(&self, country: Option<&str>) -> Result<Vec<SourceDto>>;
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_timeout(base_url, api_key, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_timeout(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidResponse(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        base.join(path)
            .map_err(|e| Error::InvalidResponse(format!("Invalid endpoint path '{}': {}", path, e)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::InvalidResponse(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request failed with HTTP {}", status.as_u16());
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::InvalidResponse(format!("Failed to read response body: {}", e)))?;

        debug!("Downloaded {} bytes", body.len());

        serde_json::from_slice(&body).map_err(|e| Error::Decoding(e.to_string()))
    }
}

#[async_trait]
impl NewsApi for NewsClient {
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<Vec<Article>> {
        // An empty credential is offline preview mode, not an error.
        if self.api_key.is_empty() {
            debug!("No API key configured, returning preview articles");
            return Ok(Article::previews());
        }

        let mut url = self.endpoint(TOP_HEADLINES_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            if query.sources.is_empty() {
                if let Some(country) = &query.country {
                    pairs.append_pair("country", country);
                }
                if let Some(category) = &query.category {
                    pairs.append_pair("category", category);
                }
            } else {
                pairs.append_pair("sources", &query.sources.join(","));
            }
            pairs.append_pair("pageSize", &query.page_size.to_string());
            pairs.append_pair("apiKey", &self.api_key);
        }

        let payload: HeadlinesResponse = self.get_json(url).await?;
        Ok(payload.articles)
    }

    async fn sources(&self, country: Option<&str>) -> Result<Vec<SourceDto>> {
        let mut url = self.endpoint(SOURCES_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(country) = country {
                pairs.append_pair("country", country);
            }
            pairs.append_pair("apiKey", &self.api_key);
        }

        let payload: SourcesResponse = self.get_json(url).await?;
        Ok(payload.sources)
    }
}
