use data_loader::MovieId;
use thiserror::Error;

/// Errors that can occur when looking up a poster
#[derive(Error, Debug)]
pub enum PosterError {
    #[error("Poster lookup for movie {movie_id} timed out")]
    Timeout { movie_id: MovieId },

    #[error("Poster request for movie {movie_id} failed: {source}")]
    Http {
        movie_id: MovieId,
        #[source]
        source: reqwest::Error,
    },

    #[error("Metadata API returned status {status} for movie {movie_id}")]
    Status { movie_id: MovieId, status: u16 },

    #[error("Invalid metadata response for movie {movie_id}: {reason}")]
    InvalidResponse { movie_id: MovieId, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl PosterError {
    /// Classify a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(movie_id: MovieId, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            PosterError::Timeout { movie_id }
        } else {
            PosterError::Http { movie_id, source }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PosterError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;
