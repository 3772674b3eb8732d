use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::news::client::HeadlinesQuery;
use crate::news::repository::NewsRepository;
use crate::news::{Article, Source};
use crate::storage::traits::{keys, KeyValueStore};

#[derive(Default)]
struct HeadlineState {
    articles: Vec<Article>,
    sources: Vec<Source>,
    selected: HashSet<Source>,
    headline_error: Option<String>,
    source_error: Option<String>,
}

/// Owns the in-memory article/source state, orchestrates fetches, derives
/// the filtered view, and persists the source-selection preference.
///
/// State is read through plain getters returning clones. Mutations are
/// serialized through the internal lock, which is never held across an
/// `.await`; per-kind busy flags drop re-entrant loads while headline and
/// source loads may proceed concurrently. In-flight requests always run to
/// completion: there is no cancellation and no coordinator-level timeout.
pub struct HeadlineCoordinator {
    repository: NewsRepository,
    store: Arc<dyn KeyValueStore>,
    config: Config,
    state: RwLock<HeadlineState>,
    loading_headlines: AtomicBool,
    loading_sources: AtomicBool,
}

impl HeadlineCoordinator {
    /// Restores cached sources and the persisted selection, dropping any
    /// selection entry the cached set no longer contains. When nothing valid
    /// remains, the first `default_selected_count` sources are selected.
    pub fn new(repository: NewsRepository, store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        let mut state = HeadlineState::default();
        state.sources = repository.cached_sources();
        sort_by_name(&mut state.sources);
        state.selected = load_selection(store.as_ref());

        let coordinator = Self {
            repository,
            store,
            config,
            state: RwLock::new(state),
            loading_headlines: AtomicBool::new(false),
            loading_sources: AtomicBool::new(false),
        };

        {
            let mut state = coordinator.state.write();
            coordinator.reconcile_selection(&mut state);
        }

        coordinator
    }

    /// Fetch the source catalog and reconcile the selection against it.
    ///
    /// The repository already falls back to cached sources, so an error here
    /// means both the remote and the cache came up empty. When reconciliation
    /// had to apply the default selection, one headline load is triggered so
    /// the article list matches it.
    pub async fn load_sources(&self, country: Option<&str>) {
        if self
            .loading_sources
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Source load already in flight, dropping call");
            return;
        }

        self.state.write().source_error = None;

        let result = self.repository.sources(country).await;

        let defaulted = match result {
            Ok(mut sources) => {
                sort_by_name(&mut sources);
                let mut state = self.state.write();
                state.sources = sources;
                self.reconcile_selection(&mut state)
            }
            Err(err) => {
                warn!("Source load failed: {}", err);
                self.state.write().source_error = Some(err.to_string());
                false
            }
        };

        self.loading_sources.store(false, Ordering::SeqCst);

        if defaulted {
            self.load_top_headlines(None, None, None).await;
        }
    }

    /// Fetch headlines for the current selection, or for the given filters
    /// when nothing is selected. `None` arguments fall back to the
    /// configured defaults.
    pub async fn load_top_headlines(
        &self,
        country: Option<&str>,
        category: Option<&str>,
        sources: Option<&[String]>,
    ) {
        if self
            .loading_headlines
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Headline load already in flight, dropping call");
            return;
        }

        self.state.write().headline_error = None;

        let query = self.headlines_query(country, category, sources);
        let result = self.repository.top_headlines(&query).await;

        {
            let mut state = self.state.write();
            match result {
                Ok(articles) => {
                    debug!("Loaded {} articles", articles.len());
                    state.articles = articles;
                    state.headline_error = None;
                }
                Err(err) => {
                    warn!("Headline load failed: {}", err);
                    state.headline_error = Some(err.to_string());
                }
            }
        }

        self.loading_headlines.store(false, Ordering::SeqCst);
    }

    /// Selection drives the request: a non-empty selection turns into a
    /// comma-joinable id list (entries without a catalog id are skipped) and
    /// a page size scaled by the selection size.
    fn headlines_query(
        &self,
        country: Option<&str>,
        category: Option<&str>,
        sources: Option<&[String]>,
    ) -> HeadlinesQuery {
        let state = self.state.read();

        if !state.selected.is_empty() {
            let mut ids: Vec<String> = state
                .selected
                .iter()
                .filter_map(|s| s.id.clone())
                .collect();
            // Set iteration order is unstable; keep the request deterministic.
            ids.sort();
            return HeadlinesQuery::for_sources(ids, state.selected.len() * 10);
        }

        HeadlinesQuery {
            country: Some(country.unwrap_or(&self.config.country).to_string()),
            category: category.map(str::to_string).or_else(|| self.config.category.clone()),
            sources: sources.map(<[String]>::to_vec).unwrap_or_default(),
            page_size: self.config.page_size,
        }
    }

    pub fn toggle_source(&self, source: &Source) {
        let mut state = self.state.write();
        if !state.selected.remove(source) {
            state.selected.insert(source.clone());
        }
        self.persist_selection(&state.selected);
    }

    pub fn clear_selection(&self) {
        let mut state = self.state.write();
        state.selected.clear();
        self.persist_selection(&state.selected);
    }

    pub fn articles(&self) -> Vec<Article> {
        self.state.read().articles.clone()
    }

    pub fn sources(&self) -> Vec<Source> {
        self.state.read().sources.clone()
    }

    pub fn selected_sources(&self) -> HashSet<Source> {
        self.state.read().selected.clone()
    }

    /// All articles when the selection is empty, otherwise exactly those
    /// whose source is a selection member.
    pub fn filtered_articles(&self) -> Vec<Article> {
        let state = self.state.read();
        if state.selected.is_empty() {
            state.articles.clone()
        } else {
            state
                .articles
                .iter()
                .filter(|a| state.selected.contains(&a.source))
                .cloned()
                .collect()
        }
    }

    pub fn headline_error(&self) -> Option<String> {
        self.state.read().headline_error.clone()
    }

    pub fn source_error(&self) -> Option<String> {
        self.state.read().source_error.clone()
    }

    pub fn is_loading_headlines(&self) -> bool {
        self.loading_headlines.load(Ordering::SeqCst)
    }

    pub fn is_loading_sources(&self) -> bool {
        self.loading_sources.load(Ordering::SeqCst)
    }

    /// Drops selection entries not in the current source list; when the
    /// selection empties and sources exist, selects the first N. Persists
    /// whenever the set changed. Returns true iff the default fired.
    fn reconcile_selection(&self, state: &mut HeadlineState) -> bool {
        let before = state.selected.clone();

        let HeadlineState { sources, selected, .. } = state;
        selected.retain(|s| sources.contains(s));

        let mut defaulted = false;
        if state.selected.is_empty() && !state.sources.is_empty() {
            let n = self.config.default_selected_count.min(state.sources.len());
            state.selected = state.sources[..n].iter().cloned().collect();
            defaulted = true;
        }

        if state.selected != before {
            self.persist_selection(&state.selected);
        }

        defaulted
    }

    fn persist_selection(&self, selected: &HashSet<Source>) {
        let mut ordered: Vec<&Source> = selected.iter().collect();
        ordered.sort_by_key(|s| s.name.to_lowercase());

        let bytes = match serde_json::to_vec(&ordered) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("Failed to encode selected sources: {}", err);
                return;
            }
        };

        if let Err(err) = self.store.set(keys::SELECTED_SOURCES, &bytes) {
            error!("Failed to persist selected sources: {}", err);
        } else {
            debug!("Cache save: {}: {} items", keys::SELECTED_SOURCES, ordered.len());
        }
    }
}

fn sort_by_name(sources: &mut [Source]) {
    sources.sort_by_key(|s| s.name.to_lowercase());
}

fn load_selection(store: &dyn KeyValueStore) -> HashSet<Source> {
    let bytes = match store.get(keys::SELECTED_SOURCES) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("Cache miss: {}", keys::SELECTED_SOURCES);
            return HashSet::new();
        }
        Err(err) => {
            error!("Cache error: {}: {}", keys::SELECTED_SOURCES, err);
            return HashSet::new();
        }
    };

    match serde_json::from_slice::<Vec<Source>>(&bytes) {
        Ok(sources) => sources.into_iter().collect(),
        Err(err) => {
            error!("Cache error: {}: {}", keys::SELECTED_SOURCES, err);
            HashSet::new()
        }
    }
}
