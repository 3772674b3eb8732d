use std::sync::Arc;

use tracing::{debug, error};

use crate::error::Result;
use crate::news::Article;
use crate::storage::traits::{keys, KeyValueStore};

/// CRUD over the locally persisted saved-article list, keyed by article URL.
///
/// Each mutation reads the whole persisted list, edits it in memory, and
/// rewrites the encoded blob. Last writer wins at the process level; this is
/// not designed for concurrent writers.
pub struct SavedArticlesStore {
    store: Arc<dyn KeyValueStore>,
}

impl SavedArticlesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Idempotent: saving an already-saved article is a no-op, not an error.
    pub fn save(&self, article: &Article) -> Result<()> {
        let mut saved = self.list();
        if !saved.iter().any(|a| a.url == article.url) {
            saved.push(article.clone());
            self.write(&saved)?;
        }
        Ok(())
    }

    /// Idempotent: removing an absent article is a no-op.
    pub fn remove(&self, article: &Article) -> Result<()> {
        let mut saved = self.list();
        saved.retain(|a| a.url != article.url);
        self.write(&saved)
    }

    pub fn is_saved(&self, article: &Article) -> bool {
        self.list().iter().any(|a| a.url == article.url)
    }

    /// A missing key or an undecodable blob both read as an empty store:
    /// corrupt persisted state must never brick the feature.
    pub fn list(&self) -> Vec<Article> {
        let bytes = match self.store.get(keys::SAVED_ARTICLES) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss: {}", keys::SAVED_ARTICLES);
                return Vec::new();
            }
            Err(err) => {
                error!("Cache error: {}: {}", keys::SAVED_ARTICLES, err);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(articles) => articles,
            Err(err) => {
                error!("Cache error: {}: {}", keys::SAVED_ARTICLES, err);
                Vec::new()
            }
        }
    }

    fn write(&self, articles: &[Article]) -> Result<()> {
        let bytes = serde_json::to_vec(articles)?;
        self.store.set(keys::SAVED_ARTICLES, &bytes)?;
        debug!("Cache save: {}: {} items", keys::SAVED_ARTICLES, articles.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::MemoryStore;

    fn create_store() -> (SavedArticlesStore, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        (SavedArticlesStore::new(kv.clone()), kv)
    }

    #[test]
    fn test_save_article() {
        let (store, _) = create_store();
        let article = Article::preview();

        store.save(&article).unwrap();

        assert!(store.is_saved(&article));
        let saved = store.list();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].url, article.url);
    }

    #[test]
    fn test_save_duplicate_appears_once() {
        let (store, _) = create_store();
        let article = Article::preview();

        store.save(&article).unwrap();
        store.save(&article).unwrap();

        let saved = store.list();
        assert_eq!(saved.iter().filter(|a| a.url == article.url).count(), 1);
        assert_eq!(saved.len(), 1);
    }

    #[test]
    fn test_same_url_different_fields_is_same_entity() {
        let (store, _) = create_store();
        let article = Article::preview();
        let mut revised = Article::preview();
        revised.title = "Revised headline".to_string();

        store.save(&article).unwrap();
        store.save(&revised).unwrap();

        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_remove_article() {
        let (store, _) = create_store();
        let article = Article::preview();
        store.save(&article).unwrap();

        store.remove(&article).unwrap();

        assert!(!store.is_saved(&article));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_remove_absent_article_is_ok() {
        let (store, _) = create_store();
        let article = Article::preview();

        store.remove(&article).unwrap();
        assert!(!store.is_saved(&article));
    }

    #[test]
    fn test_saved_state_lifecycle() {
        let (store, _) = create_store();
        let article = Article::preview();

        assert!(!store.is_saved(&article));
        store.save(&article).unwrap();
        assert!(store.is_saved(&article));
        store.remove(&article).unwrap();
        assert!(!store.is_saved(&article));
    }

    #[test]
    fn test_multiple_articles() {
        let (store, _) = create_store();
        let articles = Article::previews();

        for article in &articles {
            store.save(article).unwrap();
        }

        let saved = store.list();
        assert_eq!(saved.len(), articles.len());

        store.remove(&articles[0]).unwrap();
        assert_eq!(store.list().len(), articles.len() - 1);
        assert!(!store.is_saved(&articles[0]));
        assert!(store.is_saved(&articles[1]));
    }

    #[test]
    fn test_persists_across_store_instances() {
        let kv = Arc::new(MemoryStore::new());
        let article = Article::preview();

        {
            let store = SavedArticlesStore::new(kv.clone());
            store.save(&article).unwrap();
        }

        let store = SavedArticlesStore::new(kv);
        assert!(store.is_saved(&article));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::SAVED_ARTICLES, b"not json at all").unwrap();

        let store = SavedArticlesStore::new(kv);
        assert!(store.list().is_empty());

        // The store stays usable after the corrupt read.
        let article = Article::preview();
        store.save(&article).unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let (store, _) = create_store();
        let article = Article::previews()[1].clone();

        store.save(&article).unwrap();
        let saved = store.list();

        assert_eq!(saved[0], article);
    }
}
