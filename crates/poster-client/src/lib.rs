//! Poster lookup client for the TMDB metadata API.
//!
//! This crate resolves movie ids to poster image URLs. It handles:
//! - Building the metadata request and the final image URL
//! - A bounded request timeout
//! - Typed errors for timeouts, transport failures, bad statuses and bad bodies
//! - Caching successful answers per movie id

pub mod client;
pub mod error;

pub use client::{
    DEFAULT_API_URL, DEFAULT_TIMEOUT, IMAGE_BASE_URL, PosterLookup, TmdbConfig, TmdbPosterClient,
    poster_url,
};
pub use error::{PosterError, Result};
