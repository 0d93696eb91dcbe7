//! # Recommendation Service
//!
//! Answers "movies like this one" queries against a prebuilt content index:
//! 1. Resolve the title to a corpus position
//! 2. Read the top-k row neighbors from the similarity matrix
//! 3. Map positions back to movie ids and titles
//! 4. Optionally look up posters for every entry concurrently
//!
//! The index is immutable and shared through an `Arc`, so one service can
//! be cloned into as many tasks as needed.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use data_loader::MovieId;
use poster_client::{DEFAULT_TIMEOUT, PosterError, PosterLookup};
use similarity::{ContentIndex, SimilarityError};

/// Recommendations returned when no limit is configured
pub const DEFAULT_TOP_K: usize = 5;

/// Errors from a recommendation query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    #[error("No movie titled '{title}'")]
    NotFound { title: String },

    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

/// One recommended movie
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
}

/// Ranked recommendations for one query title, best first
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    pub query_title: String,
    pub query_id: MovieId,
    pub movies: Vec<RecommendedMovie>,
}

impl RecommendationResult {
    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.title.as_str()).collect()
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|m| m.movie_id).collect()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// A recommended movie with the outcome of its poster lookup
#[derive(Debug)]
pub struct MovieWithPoster {
    pub movie: RecommendedMovie,
    pub poster: Result<Option<String>, PosterError>,
}

/// Recommendations paired with poster lookups, in ranking order
#[derive(Debug)]
pub struct PosterRecommendations {
    pub query_title: String,
    pub entries: Vec<MovieWithPoster>,
}

impl PosterRecommendations {
    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.movie.title.as_str()).collect()
    }

    /// One URL per entry; `placeholder` stands in for missing or failed posters.
    pub fn poster_urls(&self, placeholder: &str) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| match &entry.poster {
                Ok(Some(url)) => url.clone(),
                Ok(None) | Err(_) => placeholder.to_string(),
            })
            .collect()
    }

    pub fn failed_lookups(&self) -> usize {
        self.entries.iter().filter(|e| e.poster.is_err()).count()
    }
}

/// Content-based recommender over a shared index
#[derive(Debug, Clone)]
pub struct RecommendationService {
    index: Arc<ContentIndex>,
    top_k: usize,
    poster_timeout: Duration,
}

impl RecommendationService {
    pub fn new(index: Arc<ContentIndex>) -> Self {
        Self {
            index,
            top_k: DEFAULT_TOP_K,
            poster_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Change how many recommendations each query returns (builder pattern)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Upper bound on each poster lookup, whatever the lookup does itself
    pub fn with_poster_timeout(mut self, poster_timeout: Duration) -> Self {
        self.poster_timeout = poster_timeout;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn poster_timeout(&self) -> Duration {
        self.poster_timeout
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// Movies most similar to the one titled exactly `title`.
    ///
    /// The query movie itself is never part of the result. A movie with no
    /// usable content still gets an answer: every score is 0 and the order
    /// falls back to corpus position.
    #[instrument(skip(self))]
    pub fn recommend(&self, title: &str) -> Result<RecommendationResult, RecommendError> {
        let position =
            self.index
                .position_of_title(title)
                .ok_or_else(|| RecommendError::NotFound {
                    title: title.to_string(),
                })?;

        let query = self
            .index
            .movie(position)
            .ok_or_else(|| RecommendError::NotFound {
                title: title.to_string(),
            })?;

        let neighbors = self.index.neighbors(position, self.top_k)?;
        let movies: Vec<RecommendedMovie> = neighbors
            .into_iter()
            .filter_map(|neighbor| {
                self.index.movie(neighbor.row).map(|record| RecommendedMovie {
                    movie_id: record.id,
                    title: record.title.clone(),
                    score: neighbor.score,
                })
            })
            .collect();

        debug!("Resolved '{}' to position {} with {} results", title, position, movies.len());

        Ok(RecommendationResult {
            query_title: query.title.clone(),
            query_id: query.id,
            movies,
        })
    }

    /// `recommend`, then one poster lookup per entry, all in flight at once.
    ///
    /// Lookup failures are kept per entry and never fail the query. A lookup
    /// still pending after the poster timeout is recorded as a timeout.
    #[instrument(skip(self, lookup))]
    pub async fn recommend_with_posters<L>(
        &self,
        title: &str,
        lookup: &L,
    ) -> Result<PosterRecommendations, RecommendError>
    where
        L: PosterLookup + ?Sized,
    {
        let result = self.recommend(title)?;

        let posters = join_all(result.movies.iter().map(|movie| async move {
            let movie_id = movie.movie_id;
            tokio::time::timeout(self.poster_timeout, lookup.fetch_poster(movie_id))
                .await
                .unwrap_or_else(|_| Err(PosterError::Timeout { movie_id }))
        }))
        .await;

        let entries: Vec<MovieWithPoster> = result
            .movies
            .into_iter()
            .zip(posters)
            .map(|(movie, poster)| {
                if let Err(e) = &poster {
                    warn!("Poster lookup failed for '{}': {}", movie.title, e);
                }
                MovieWithPoster { movie, poster }
            })
            .collect();

        let failed = entries.iter().filter(|e| e.poster.is_err()).count();
        info!(
            "Fetched posters for {} recommendations ({} failed)",
            entries.len(),
            failed
        );

        Ok(PosterRecommendations {
            query_title: result.query_title,
            entries,
        })
    }
}
