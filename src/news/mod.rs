pub mod client;
pub mod repository;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: Option<String>,
    pub source: Source,
}

/// A named news publisher. Equality and hashing cover the `(id, name)` pair,
/// so sources can act as set elements for deduplication and selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Wire shape of the sources endpoint. Carries the `language` tag used for
/// client-side filtering; collapsed to [`Source`] before leaving the
/// repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<SourceDto> for Source {
    fn from(dto: SourceDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesResponse {
    pub status: String,
    pub total_results: usize,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub status: String,
    pub sources: Vec<SourceDto>,
}

impl Article {
    /// The URL is the article's identity: two articles are the same entity
    /// iff their URLs match, regardless of other field differences.
    pub fn id(&self) -> &str {
        &self.url
    }

    pub fn preview() -> Article {
        Article {
            title: "Welcome to your news reader".to_string(),
            author: Some("Demo Author".to_string()),
            description: Some(
                "Kickstart your news experience with built-in sample headlines.".to_string(),
            ),
            url: "https://example.com/welcome".to_string(),
            image_url: Some("https://picsum.photos/600/400".to_string()),
            published_at: Utc::now(),
            content: Some("Full story goes here for preview purposes.".to_string()),
            source: Source {
                id: None,
                name: "Demo Source".to_string(),
            },
        }
    }

    /// Fixed offline set returned when no API credential is configured.
    pub fn previews() -> Vec<Article> {
        vec![
            Article::preview(),
            Article {
                title: "Designing a reusable networking layer".to_string(),
                author: Some("API Team".to_string()),
                description: Some(
                    "How to structure async API calls behind a small trait.".to_string(),
                ),
                url: "https://example.com/networking".to_string(),
                image_url: None,
                published_at: Utc::now() - Duration::hours(1),
                content: Some("Details about networking patterns...".to_string()),
                source: Source {
                    id: Some("network".to_string()),
                    name: "Networking Times".to_string(),
                },
            },
            Article {
                title: "Composable list views".to_string(),
                author: Some("UX Writer".to_string()),
                description: Some(
                    "Rows, lists, placeholders and empty states that compose.".to_string(),
                ),
                url: "https://example.com/views".to_string(),
                image_url: Some("https://picsum.photos/500/300".to_string()),
                published_at: Utc::now() - Duration::hours(2),
                content: Some("Composable view discussion...".to_string()),
                source: Source {
                    id: Some("ux".to_string()),
                    name: "UX Daily".to_string(),
                },
            },
        ]
    }
}
