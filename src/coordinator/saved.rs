use parking_lot::RwLock;
use tracing::error;

use crate::news::Article;
use crate::storage::saved_articles::SavedArticlesStore;

/// Reactive wrapper over [`SavedArticlesStore`]: holds an in-memory mirror of
/// the store's contents, refreshed after every successful mutation.
///
/// Store-level errors are logged, not surfaced. A failed mutation leaves the
/// store untouched and the mirror is not refreshed, so the visible state
/// stays consistent with what is actually persisted.
pub struct SavedArticlesCoordinator {
    store: SavedArticlesStore,
    saved: RwLock<Vec<Article>>,
}

impl SavedArticlesCoordinator {
    pub fn new(store: SavedArticlesStore) -> Self {
        let saved = store.list();
        Self {
            store,
            saved: RwLock::new(saved),
        }
    }

    pub fn refresh(&self) {
        *self.saved.write() = self.store.list();
    }

    pub fn save(&self, article: &Article) {
        match self.store.save(article) {
            Ok(()) => self.refresh(),
            Err(err) => error!("Failed to save article: {}", err),
        }
    }

    pub fn remove(&self, article: &Article) {
        match self.store.remove(article) {
            Ok(()) => self.refresh(),
            Err(err) => error!("Failed to remove article: {}", err),
        }
    }

    /// Asks the store, not the mirror, so the answer stays correct even when
    /// an earlier store error left the mirror stale.
    pub fn is_saved(&self, article: &Article) -> bool {
        self.store.is_saved(article)
    }

    pub fn toggle(&self, article: &Article) {
        if self.is_saved(article) {
            self.remove(article);
        } else {
            self.save(article);
        }
    }

    pub fn clear_all(&self) {
        let snapshot = self.saved.read().clone();
        for article in &snapshot {
            if let Err(err) = self.store.remove(article) {
                error!("Failed to remove article: {}", err);
            }
        }
        self.refresh();
    }

    pub fn saved_articles(&self) -> Vec<Article> {
        self.saved.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::storage::traits::{KeyValueStore, MemoryStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Memory store whose writes can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Storage("write refused".to_string()));
            }
            self.inner.set(key, value)
        }
    }

    fn create_coordinator() -> (SavedArticlesCoordinator, Arc<FlakyStore>) {
        let kv = Arc::new(FlakyStore::default());
        let store = SavedArticlesStore::new(kv.clone());
        (SavedArticlesCoordinator::new(store), kv)
    }

    #[test]
    fn test_initial_state_empty() {
        let (coordinator, _) = create_coordinator();
        assert!(coordinator.saved_articles().is_empty());
    }

    #[test]
    fn test_loads_existing_articles_on_construction() {
        let kv = Arc::new(FlakyStore::default());
        SavedArticlesStore::new(kv.clone())
            .save(&Article::preview())
            .unwrap();

        let coordinator = SavedArticlesCoordinator::new(SavedArticlesStore::new(kv));
        assert_eq!(coordinator.saved_articles().len(), 1);
    }

    #[test]
    fn test_save_updates_mirror() {
        let (coordinator, _) = create_coordinator();
        let article = Article::preview();

        coordinator.save(&article);

        assert!(coordinator.is_saved(&article));
        assert!(coordinator
            .saved_articles()
            .iter()
            .any(|a| a.url == article.url));
    }

    #[test]
    fn test_remove_updates_mirror() {
        let (coordinator, _) = create_coordinator();
        let article = Article::preview();
        coordinator.save(&article);

        coordinator.remove(&article);

        assert!(!coordinator.is_saved(&article));
        assert!(coordinator.saved_articles().is_empty());
    }

    #[test]
    fn test_toggle_when_not_saved_adds() {
        let (coordinator, _) = create_coordinator();
        let article = Article::preview();

        coordinator.toggle(&article);
        assert!(coordinator.is_saved(&article));
    }

    #[test]
    fn test_toggle_when_saved_removes() {
        let (coordinator, _) = create_coordinator();
        let article = Article::preview();
        coordinator.save(&article);

        coordinator.toggle(&article);
        assert!(!coordinator.is_saved(&article));
    }

    #[test]
    fn test_duplicate_save_appears_once() {
        let (coordinator, _) = create_coordinator();
        let article = Article::preview();

        coordinator.save(&article);
        coordinator.save(&article);

        let count = coordinator
            .saved_articles()
            .iter()
            .filter(|a| a.url == article.url)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_save_error_leaves_state_consistent() {
        let (coordinator, kv) = create_coordinator();
        let article = Article::preview();
        kv.fail_writes.store(true, Ordering::SeqCst);

        coordinator.save(&article);

        assert!(!coordinator.is_saved(&article));
        assert!(coordinator.saved_articles().is_empty());
    }

    #[test]
    fn test_remove_error_leaves_article_saved() {
        let (coordinator, kv) = create_coordinator();
        let article = Article::preview();
        coordinator.save(&article);

        kv.fail_writes.store(true, Ordering::SeqCst);
        coordinator.remove(&article);

        assert!(coordinator.is_saved(&article));
        assert_eq!(coordinator.saved_articles().len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let (coordinator, _) = create_coordinator();
        for article in Article::previews() {
            coordinator.save(&article);
        }
        assert_eq!(coordinator.saved_articles().len(), 3);

        coordinator.clear_all();

        assert!(coordinator.saved_articles().is_empty());
    }
}
