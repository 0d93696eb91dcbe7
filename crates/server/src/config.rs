use poster_client::TmdbConfig;
use serde::Deserialize;
use similarity::IndexConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Directory holding the movies and credits CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// TMDB API key; posters are disabled without one
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB metadata API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Poster request timeout in milliseconds
    #[serde(default = "default_poster_timeout_ms")]
    pub poster_timeout_ms: u64,

    /// Recommendations returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Vocabulary size cap
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/tmdb")
}

fn default_tmdb_api_url() -> String {
    poster_client::DEFAULT_API_URL.to_string()
}

fn default_poster_timeout_ms() -> u64 {
    5000
}

fn default_top_k() -> usize {
    5
}

fn default_max_features() -> usize {
    features::DEFAULT_MAX_FEATURES
}

impl ServiceConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<ServiceConfig>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, ServiceConfig>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.max_features)
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_millis(self.poster_timeout_ms)
    }

    /// Poster client settings, or `None` when no API key is configured
    pub fn tmdb_config(&self) -> Option<TmdbConfig> {
        self.tmdb_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| {
                TmdbConfig::new(key)
                    .with_api_url(self.tmdb_api_url.clone())
                    .with_timeout(self.poster_timeout())
            })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            poster_timeout_ms: default_poster_timeout_ms(),
            top_k: default_top_k(),
            max_features: default_max_features(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.data_dir, PathBuf::from("data/tmdb"));
        assert_eq!(config.top_k, 5);
        assert_eq!(config.max_features, 5000);
        assert!(config.tmdb_config().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_vars(vars(&[
            ("DATA_DIR", "/srv/tmdb"),
            ("TMDB_API_KEY", "secret"),
            ("TMDB_API_URL", "http://localhost:8080"),
            ("POSTER_TIMEOUT_MS", "250"),
            ("TOP_K", "10"),
            ("MAX_FEATURES", "100"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/tmdb"));
        assert_eq!(config.top_k, 10);
        assert_eq!(config.index_config().max_features, 100);
        assert_eq!(config.poster_timeout(), Duration::from_millis(250));

        let tmdb = config.tmdb_config().unwrap();
        assert_eq!(tmdb.api_key, "secret");
        assert_eq!(tmdb.api_url, "http://localhost:8080");
        assert_eq!(tmdb.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_blank_api_key_disables_posters() {
        let config = ServiceConfig::from_vars(vars(&[("TMDB_API_KEY", "  ")])).unwrap();
        assert!(config.tmdb_config().is_none());
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        assert!(ServiceConfig::from_vars(vars(&[("TOP_K", "many")])).is_err());
    }
}
