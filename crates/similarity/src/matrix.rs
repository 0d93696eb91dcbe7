//! Cosine similarity matrix and top-k queries.
//!
//! ## Algorithm
//! 1. Precompute the norm of every vector
//! 2. For each row i (in parallel), score every column j with
//!    dot(v_i, v_j) / (|v_i| * |v_j|)
//! 3. A zero vector scores 0 everywhere; any other vector scores exactly
//!    1.0 against itself
//!
//! Both operands of every entry are combined in the same way whichever
//! row computes it, so M[i][j] and M[j][i] are bit-identical.

use crate::error::SimilarityError;
use features::FeatureVector;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// One query result: a corpus position and its score against the query row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f32,
}

/// Cosine similarity of two count vectors; 0.0 when either is all-zero.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f32 {
    score_with_norms(a, b, a.norm(), b.norm())
}

fn score_with_norms(a: &FeatureVector, b: &FeatureVector, norm_a: f64, norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) as f64 / (norm_a * norm_b)) as f32
}

/// Dense, row-major N×N matrix of pairwise cosine similarities.
///
/// Read-only once built; rebuilding means recomputing from new vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Score every pair of vectors.
    ///
    /// O(N² · nnz) work, split by row across the rayon pool.
    pub fn build(vectors: &[FeatureVector]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.par_iter().map(FeatureVector::norm).collect();

        let mut scores = vec![0.0f32; size * size];
        scores
            .par_chunks_mut(size.max(1))
            .enumerate()
            .for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = if i == j {
                        if norms[i] == 0.0 { 0.0 } else { 1.0 }
                    } else {
                        score_with_norms(&vectors[i], &vectors[j], norms[i], norms[j])
                    };
                }
            });

        info!("Built {}x{} similarity matrix", size, size);
        Self { size, scores }
    }

    /// Number of movies (rows = columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Score between two corpus positions
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.size && j < self.size {
            Some(self.scores[i * self.size + j])
        } else {
            None
        }
    }

    /// Every score against `row`, indexed by column
    pub fn row(&self, row: usize) -> Result<&[f32], SimilarityError> {
        if row >= self.size {
            return Err(SimilarityError::RowOutOfRange {
                row,
                size: self.size,
            });
        }
        let start = row * self.size;
        Ok(&self.scores[start..start + self.size])
    }

    /// The `k` most similar movies to `row`, excluding `row` itself.
    ///
    /// Sorted by descending score; equal scores by ascending row index.
    /// Returns fewer than `k` only when the corpus has fewer than k + 1 movies.
    #[instrument(skip(self))]
    pub fn query(&self, row: usize, k: usize) -> Result<Vec<Neighbor>, SimilarityError> {
        let scores = self.row(row)?;

        let mut neighbors: Vec<Neighbor> = scores
            .iter()
            .enumerate()
            .map(|(column, &score)| Neighbor { row: column, score })
            .collect();
        neighbors.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.row.cmp(&b.row)));

        let top: Vec<Neighbor> = neighbors
            .into_iter()
            .filter(|neighbor| neighbor.row != row)
            .take(k)
            .collect();
        debug!("Query row {} returned {} neighbors", row, top.len());
        Ok(top)
    }
}
