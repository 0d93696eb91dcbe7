//! The content index: everything the recommender reads, built in one pass.
//!
//! ## Build stages
//! 1. Extract a tag sequence per catalog record
//! 2. Fit the vocabulary and encode count vectors
//! 3. Score every pair of vectors into the similarity matrix
//!
//! Every stage keeps the catalog's ordering, so position `i` means the same
//! movie in the catalog, the tags, the vectors and the matrix.

use crate::error::SimilarityError;
use crate::matrix::{Neighbor, SimilarityMatrix};
use data_loader::{MovieCatalog, MovieRecord};
use features::{
    DEFAULT_MAX_FEATURES, FeatureExtractor, FeatureVector, TagSequence, Vectorizer, Vocabulary,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Index build settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Vocabulary size cap
    pub max_features: usize,
}

impl IndexConfig {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

/// Timings and counts gathered while building
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub movies: usize,
    pub vocabulary_size: usize,
    pub zero_vectors: usize,
    pub extract_time: Duration,
    pub vectorize_time: Duration,
    pub matrix_time: Duration,
}

impl BuildStats {
    pub fn total_time(&self) -> Duration {
        self.extract_time + self.vectorize_time + self.matrix_time
    }
}

/// Immutable, corpus-ordered artifact of one index build.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    catalog: MovieCatalog,
    tags: Vec<TagSequence>,
    vocabulary: Vocabulary,
    vectors: Vec<FeatureVector>,
    matrix: SimilarityMatrix,
    stats: BuildStats,
}

impl ContentIndex {
    /// Build with the default extractor (Porter stemming) and English stop words.
    pub fn build(catalog: MovieCatalog, config: &IndexConfig) -> Self {
        Self::build_with(
            catalog,
            &FeatureExtractor::default(),
            &Vectorizer::new(config.max_features),
        )
    }

    /// Build with a caller-supplied extractor and vectorizer.
    #[instrument(skip_all, fields(movies = catalog.len()))]
    pub fn build_with(
        catalog: MovieCatalog,
        extractor: &FeatureExtractor,
        vectorizer: &Vectorizer,
    ) -> Self {
        let start = Instant::now();
        let tags = extractor.extract_all(catalog.records());
        let extract_time = start.elapsed();

        let start = Instant::now();
        let (vocabulary, vectors) = vectorizer.fit_transform(&tags);
        let vectorize_time = start.elapsed();

        let start = Instant::now();
        let matrix = SimilarityMatrix::build(&vectors);
        let matrix_time = start.elapsed();

        let stats = BuildStats {
            movies: catalog.len(),
            vocabulary_size: vocabulary.len(),
            zero_vectors: vectors.iter().filter(|v| v.is_zero()).count(),
            extract_time,
            vectorize_time,
            matrix_time,
        };

        debug!(
            "Stage timings: extract {:?}, vectorize {:?}, matrix {:?}",
            extract_time, vectorize_time, matrix_time
        );
        info!(
            "Content index ready: {} movies, {} terms, {} zero vectors in {:?}",
            stats.movies,
            stats.vocabulary_size,
            stats.zero_vectors,
            stats.total_time()
        );

        Self {
            catalog,
            tags,
            vocabulary,
            vectors,
            matrix,
            stats,
        }
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }

    pub fn tags(&self) -> &[TagSequence] {
        &self.tags
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn movie(&self, position: usize) -> Option<&MovieRecord> {
        self.catalog.get(position)
    }

    /// Position of the first movie titled exactly `title`
    pub fn position_of_title(&self, title: &str) -> Option<usize> {
        self.catalog.position_of_title(title)
    }

    /// Top `k` neighbors of the movie at `position`, self excluded.
    pub fn neighbors(&self, position: usize, k: usize) -> Result<Vec<Neighbor>, SimilarityError> {
        self.matrix.query(position, k)
    }
}

/// Equality ignores timings so two builds of the same corpus compare equal.
impl PartialEq for ContentIndex {
    fn eq(&self, other: &Self) -> bool {
        self.catalog == other.catalog
            && self.tags == other.tags
            && self.vocabulary == other.vocabulary
            && self.vectors == other.vectors
            && self.matrix == other.matrix
    }
}
