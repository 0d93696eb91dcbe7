//! # Similarity Crate
//!
//! This crate turns feature vectors into a cosine similarity matrix and
//! answers nearest-neighbor queries against it.
//!
//! ## Components
//!
//! ### SimilarityMatrix
//! Dense N×N matrix of cosine similarities between every pair of movies:
//! - Rows are computed in parallel with rayon
//! - Zero vectors score 0 against everything, themselves included
//! - Queries sort a row by score, ties by ascending row index
//!
//! ### ContentIndex
//! The immutable build artifact: catalog, tags, vocabulary, vectors and
//! matrix, all sharing the catalog's corpus ordering. Built once, then
//! shared behind an `Arc`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{ContentIndex, IndexConfig};
//! use data_loader::MovieCatalog;
//!
//! let catalog = MovieCatalog::load_from_files(Path::new("data/tmdb"))?;
//! let index = ContentIndex::build(catalog, &IndexConfig::default());
//!
//! let neighbors = index.matrix().query(0, 5)?;
//! ```

pub mod content_index;
pub mod error;
pub mod matrix;

pub use content_index::{BuildStats, ContentIndex, IndexConfig};
pub use error::SimilarityError;
pub use matrix::{Neighbor, SimilarityMatrix, cosine_similarity};
