//! Feature engineering for content-based similarity.
//!
//! This crate provides:
//! - TextNormalizer trait and the Porter stemming implementation
//! - FeatureExtractor for turning a movie record into a tag sequence
//! - Vectorizer for building a vocabulary and count vectors
//!
//! ## Architecture
//! Records are processed in stages:
//! 1. FeatureExtractor flattens overview, genres, keywords, cast and director into tags
//! 2. The TextNormalizer lowercases and stems the tags
//! 3. Vectorizer fits a vocabulary over every tag sequence and encodes each movie
//!
//! ## Example Usage
//! ```ignore
//! use features::{FeatureExtractor, Vectorizer};
//!
//! let extractor = FeatureExtractor::default();
//! let tags = extractor.extract_all(catalog.records());
//!
//! let vectorizer = Vectorizer::default();
//! let vocabulary = vectorizer.fit(&tags);
//! let vectors = vectorizer.transform_all(&tags, &vocabulary);
//! ```

pub mod extractor;
pub mod normalizer;
pub mod stopwords;
pub mod traits;
pub mod vectorizer;

// Re-export main types
pub use extractor::{FeatureExtractor, TagSequence};
pub use normalizer::{IdentityNormalizer, PorterNormalizer};
pub use stopwords::{ENGLISH_STOP_WORDS, StopWords};
pub use traits::TextNormalizer;
pub use vectorizer::{DEFAULT_MAX_FEATURES, FeatureVector, Vectorizer, Vocabulary};
