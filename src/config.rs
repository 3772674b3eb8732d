use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API credential. An empty key switches the client into offline preview
    /// mode instead of failing.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How many sources to auto-select when no persisted selection survives
    /// reconciliation.
    #[serde(default = "default_selected_count")]
    pub default_selected_count: usize,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Directory for the on-disk key-value store. Defaults to the platform
    /// data dir when absent.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| Error::Config(format!("Config file not found: {}", path.as_ref().display())))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|_| Error::Config(format!("Invalid base URL: {}", self.base_url)))?;

        if self.page_size == 0 {
            return Err(Error::Config("Page size must be greater than 0".to_string()));
        }

        if self.default_selected_count == 0 {
            return Err(Error::Config("Default selected count must be greater than 0".to_string()));
        }

        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        // NEWS_API_KEY is the historical variable name; the prefixed one wins.
        if let Ok(key) = std::env::var("NEWSDECK_API_KEY") {
            self.api_key = key;
        } else if let Ok(key) = std::env::var("NEWS_API_KEY") {
            self.api_key = key;
        }

        if let Ok(country) = std::env::var("NEWSDECK_COUNTRY") {
            self.country = country;
        }

        if let Ok(page_size) = std::env::var("NEWSDECK_PAGE_SIZE") {
            if let Ok(val) = page_size.parse() {
                self.page_size = val;
            }
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("newsdeck"))
                .ok_or_else(|| Error::Config("Could not determine data directory".to_string())),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            country: default_country(),
            category: Some("business".to_string()),
            page_size: default_page_size(),
            default_selected_count: default_selected_count(),
            timeout_secs: default_timeout(),
            data_dir: None,
        }
    }
}

fn default_base_url() -> String { "https://newsapi.org".to_string() }
fn default_country() -> String { "us".to_string() }
fn default_page_size() -> usize { 10 }
fn default_selected_count() -> usize { 3 }
fn default_timeout() -> u64 { 30 }
