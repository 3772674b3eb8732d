pub mod file_store;
pub mod saved_articles;
pub mod traits;

pub use file_store::FileStore;
pub use saved_articles::SavedArticlesStore;
pub use traits::{keys, KeyValueStore, MemoryStore};
