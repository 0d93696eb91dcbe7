//! Server crate for the reel-match recommendation engine.
//!
//! This crate contains the recommendation service that answers queries
//! against a prebuilt content index, plus the environment-driven
//! configuration shared by the binaries.

pub mod config;
pub mod recommender;

pub use config::ServiceConfig;
pub use recommender::{
    DEFAULT_TOP_K, MovieWithPoster, PosterRecommendations, RecommendError, RecommendationResult,
    RecommendationService, RecommendedMovie,
};
