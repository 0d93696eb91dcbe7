//! Error types for similarity queries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    /// Query row is not a movie in the matrix
    #[error("row {row} is out of range for a matrix of {size} movies")]
    RowOutOfRange { row: usize, size: usize },
}
