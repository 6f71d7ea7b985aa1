//! Configuration file parser for ~/.config/marquee/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`,
//! which carries the standard TMDB category set. Unknown keys are silently
//! ignored by serde, though we log a warning when the file contains
//! potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::model::Category;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
///
/// Custom Debug impl masks `api_key` to keep the credential out of logs and
/// error messages.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog API key (alternative to the MARQUEE_API_KEY env var).
    /// The env var takes precedence over the config file.
    pub api_key: Option<String>,

    /// Base origin of the catalog API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound on concurrent category fetches during a bulk load.
    pub max_concurrent_fetches: usize,

    /// The static ordered category list shown in the summary view.
    /// `header` doubles as the cache key, so headers should be unique.
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            request_timeout_secs: 10,
            max_concurrent_fetches: 4,
            categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<Category> {
    let pairs = [
        ("Now Playing", "/movie/now_playing"),
        ("Popular", "/movie/popular"),
        ("Top Rated", "/movie/top_rated"),
        ("Upcoming", "/movie/upcoming"),
    ];
    pairs
        .iter()
        .map(|(header, endpoint)| Category {
            header: header.to_string(),
            endpoint: endpoint.to_string(),
        })
        .collect()
}

/// Mask api_key in Debug output to prevent credential leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_concurrent_fetches", &self.max_concurrent_fetches)
            .field("categories", &self.categories)
            .finish()
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "api_key",
                "base_url",
                "request_timeout_secs",
                "max_concurrent_fetches",
                "categories",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            categories = config.categories.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The API key to use: the MARQUEE_API_KEY env var when set, otherwise
    /// the config file value.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("MARQUEE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.max_concurrent_fetches, 4);
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.categories[1].header, "Popular");
        assert_eq!(config.categories[1].endpoint, "/movie/popular");
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/marquee_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.categories.len(), 4);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("marquee_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://api.themoviedb.org/3");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("marquee_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 30\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.categories.len(), 4); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("marquee_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
api_key = "test-key-123"
base_url = "https://catalog.example.com/v3"
request_timeout_secs = 20
max_concurrent_fetches = 8

[[categories]]
header = "Trending"
endpoint = "/trending/movie/day"

[[categories]]
header = "Eighties Action"
endpoint = "/discover/movie?with_genres=28&primary_release_year=1985"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("test-key-123"));
        assert_eq!(config.base_url, "https://catalog.example.com/v3");
        assert_eq!(config.max_concurrent_fetches, 8);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].header, "Trending");
        assert_eq!(
            config.categories[1].endpoint,
            "/discover/movie?with_genres=28&primary_release_year=1985"
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("marquee_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("marquee_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "totally_fake_key = \"should not fail\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.categories.len(), 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config {
            api_key: Some("super-secret-key-12345".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("super-secret-key-12345"),
            "Debug output should not contain the API key"
        );
        assert!(debug_output.contains("[REDACTED]"));
    }
}
