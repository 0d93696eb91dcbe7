//! TMDB metadata client.
//!
//! API flow:
//! 1. GET `{api_url}/3/movie/{id}?api_key=…&language=en-US`
//! 2. Read `poster_path` from the JSON body
//! 3. Prefix it with the w500 image base URL

use crate::error::{PosterError, Result};
use async_trait::async_trait;
use data_loader::MovieId;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Public TMDB metadata API
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org";

/// Base URL of w500 poster images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Anything that can resolve a movie id to a poster URL.
///
/// `Ok(None)` means the movie exists but has no poster. Callers that need a
/// latency bound must apply their own timeout around `fetch_poster`.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    async fn fetch_poster(&self, movie_id: MovieId) -> Result<Option<String>>;
}

/// Full image URL for a TMDB `poster_path`; `None` for an empty path.
pub fn poster_url(poster_path: &str) -> Option<String> {
    let path = poster_path.trim_start_matches('/');
    if path.is_empty() {
        None
    } else {
        Some(format!("{}{}", IMAGE_BASE_URL, path))
    }
}

/// Connection settings for [`TmdbPosterClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

/// Poster lookups against the TMDB API with a per-id result cache.
///
/// Successful answers, including "no poster", are kept for the life of
/// the client. Failures are not cached and are retried on the next call.
#[derive(Clone)]
pub struct TmdbPosterClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Arc<RwLock<HashMap<MovieId, Option<String>>>>,
}

impl TmdbPosterClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PosterError::Client)?;

        Ok(Self {
            http_client,
            api_key: config.api_key,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Number of ids with a cached answer
    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn request_poster(&self, movie_id: MovieId) -> Result<Option<String>> {
        let url = format!("{}/3/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await
            .map_err(|e| PosterError::from_transport(movie_id, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::Status {
                movie_id,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PosterError::from_transport(movie_id, e))?;
        let details: MovieDetails =
            serde_json::from_slice(&body).map_err(|e| PosterError::InvalidResponse {
                movie_id,
                reason: e.to_string(),
            })?;

        Ok(details.poster_path.as_deref().and_then(poster_url))
    }
}

#[async_trait]
impl PosterLookup for TmdbPosterClient {
    #[instrument(skip(self))]
    async fn fetch_poster(&self, movie_id: MovieId) -> Result<Option<String>> {
        if let Some(cached) = self.cache.read().await.get(&movie_id) {
            debug!("Poster cache hit");
            return Ok(cached.clone());
        }

        let poster = self.request_poster(movie_id).await?;
        debug!(found = poster.is_some(), "Fetched poster");
        self.cache.write().await.insert(movie_id, poster.clone());
        Ok(poster)
    }
}
