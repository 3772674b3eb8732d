use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::Result;
use crate::news::client::{HeadlinesQuery, NewsApi};
use crate::news::{Article, Source};
use crate::storage::traits::{keys, KeyValueStore};

/// Combines the remote news API with the local key-value store: headline
/// fetches pass through, source fetches overwrite the cache on success and
/// fall back to it on failure.
#[derive(Clone)]
pub struct NewsRepository {
    api: Arc<dyn NewsApi>,
    store: Arc<dyn KeyValueStore>,
}

impl NewsRepository {
    pub fn new(api: Arc<dyn NewsApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store }
    }

    pub async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<Vec<Article>> {
        self.api.top_headlines(query).await
    }

    /// Fetch the source catalog.
    ///
    /// A global fetch (no country) keeps only sources tagged `"en"`; with a
    /// country filter the remote is trusted to have filtered already. Every
    /// failure branch falls back to the cached list; the error only surfaces
    /// when the cache is empty too.
    pub async fn sources(&self, country: Option<&str>) -> Result<Vec<Source>> {
        match self.api.sources(country).await {
            Ok(dtos) => {
                let sources: Vec<Source> = dtos
                    .into_iter()
                    .filter(|dto| country.is_some() || dto.language.as_deref() == Some("en"))
                    .map(Source::from)
                    .collect();
                self.cache_sources(&sources);
                Ok(sources)
            }
            Err(err) => {
                warn!("Source fetch failed, falling back to cache: {}", err);
                let cached = self.cached_sources();
                if cached.is_empty() {
                    Err(err)
                } else {
                    Ok(cached)
                }
            }
        }
    }

    /// Missing key or undecodable blob both read as an empty list.
    pub fn cached_sources(&self) -> Vec<Source> {
        let bytes = match self.store.get(keys::CACHED_SOURCES) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss: {}", keys::CACHED_SOURCES);
                return Vec::new();
            }
            Err(err) => {
                error!("Cache error: {}: {}", keys::CACHED_SOURCES, err);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(sources) => sources,
            Err(err) => {
                error!("Cache error: {}: {}", keys::CACHED_SOURCES, err);
                Vec::new()
            }
        }
    }

    /// Best effort: a cache-write failure never fails the fetch that
    /// produced the sources.
    fn cache_sources(&self, sources: &[Source]) {
        let bytes = match serde_json::to_vec(sources) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("Failed to encode source cache: {}", err);
                return;
            }
        };

        match self.store.set(keys::CACHED_SOURCES, &bytes) {
            Ok(()) => debug!("Cache save: {}: {} items", keys::CACHED_SOURCES, sources.len()),
            Err(err) => warn!("Cache write failed: {}: {}", keys::CACHED_SOURCES, err),
        }
    }
}
