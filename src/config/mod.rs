//! Configuration management for Libris.
//!
//! Configuration is read from `~/.config/libris/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub feed: FeedConfig,
}

/// Remote service locations and HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub covers_url: String,
    pub archive_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org".to_string(),
            archive_url: "https://archive.org".to_string(),
            timeout_secs: 10,
            user_agent: "libris/0.1.0".to_string(),
        }
    }
}

/// Page sizes for the search endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub book_limit: usize,
    pub author_limit: usize,
    pub subject_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            book_limit: 24,
            author_limit: 20,
            subject_limit: 12,
        }
    }
}

/// Activity feed paging and enrichment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub page_size: usize,
    pub include_bots: bool,
    pub enrich_workers: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            include_bots: true,
            enrich_workers: 10,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it when missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/libris/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("libris").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::Invalid("feed.page_size must be at least 1".into()));
        }
        if self.feed.enrich_workers == 0 {
            return Err(ConfigError::Invalid(
                "feed.enrich_workers must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.covers_url", &self.api.covers_url),
            ("api.archive_url", &self.api.archive_url),
        ] {
            if url::Url::parse(value).is_err() {
                return Err(ConfigError::Invalid(format!("{} is not a valid URL: {}", name, value)));
            }
        }
        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Libris Configuration

[api]
# Open Library REST API
base_url = "https://openlibrary.org"

# Cover and author photo images
covers_url = "https://covers.openlibrary.org"

# Internet Archive (item metadata for full-text search)
archive_url = "https://archive.org"

# Request timeout in seconds
timeout_secs = 10

user_agent = "libris/0.1.0"

[search]
# Results per book search
book_limit = 24

# Results per author search
author_limit = 20

# Books shown per subject shelf
subject_limit = 12

[feed]
# Recent changes fetched per page
page_size = 50

# Include edits made by bots
include_bots = true

# Concurrent detail lookups when enriching a page
enrich_workers = 10
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
