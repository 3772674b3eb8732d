pub mod config;
pub mod coordinator;
pub mod error;
pub mod news;
pub mod storage;

pub use config::Config;
pub use coordinator::{HeadlineCoordinator, SavedArticlesCoordinator};
pub use error::{Error, Result};
pub use news::client::{HeadlinesQuery, NewsApi, NewsClient};
pub use news::repository::NewsRepository;
pub use news::{Article, Source};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SavedArticlesStore};
