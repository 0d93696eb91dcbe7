//! Error types for the data-loader crate.
//!
//! Two kinds of failure live here:
//! - `DataLoadError` is fatal: the dataset could not be read at all.
//! - `RecordRejection` is not: one joined row failed validation and is
//!   dropped from the corpus while loading carries on.

use thiserror::Error;

/// Errors that abort loading the dataset.
///
/// The `#[derive(Error)]` macro from thiserror implements
/// `std::error::Error` and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader failed on the file structure (headers, encoding of the header row)
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A line could not be split into the expected columns
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },
}

/// Why a joined row was left out of the corpus.
///
/// Rejections are a data-quality filter, never a reason to stop loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    /// A required column was empty or absent after the join
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// An embedded sub-record list did not match its schema
    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
