//! Core domain types for the TMDB 5000 dataset.
//!
//! Three layers of types live here:
//! - raw CSV rows, exactly as the two files store them (every column optional)
//! - the typed schema of the JSON sub-records embedded in those rows
//! - `MovieRecord`, the validated, immutable record the rest of the system uses

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie, assigned by TMDB
pub type MovieId = u32;

/// Only the top-billed cast members contribute to a movie's tags
pub const MAX_BILLED_CAST: usize = 3;

/// Crew job that marks the director entry
pub const DIRECTOR_JOB: &str = "Director";

// =============================================================================
// Movie Record
// =============================================================================

/// One movie that passed ingestion.
///
/// Every field is present; lists may be empty. Created once while loading
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// Free-text synopsis
    pub overview: String,
    /// Genre names in source order, e.g. "Science Fiction"
    pub genres: Vec<String>,
    /// Keyword names in source order
    pub keywords: Vec<String>,
    /// Billed cast names, at most `MAX_BILLED_CAST`
    pub cast: Vec<String>,
    /// First crew member credited as director, if any
    pub director: Option<String>,
}

impl MovieRecord {
    /// Record with a title and an id and nothing else.
    ///
    /// Mostly useful for building small corpora by hand.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            genres: Vec::new(),
            keywords: Vec::new(),
            cast: Vec::new(),
            director: None,
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Cast is cut to the first `MAX_BILLED_CAST` names.
    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast
            .into_iter()
            .take(MAX_BILLED_CAST)
            .map(Into::into)
            .collect();
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }
}

// =============================================================================
// Embedded Sub-records
// =============================================================================
// Genres, keywords, cast and crew are stored as JSON arrays inside a CSV cell.
// Only the fields we use are declared; serde ignores the rest.

/// A genre or keyword entry: `{"id": 28, "name": "Action"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

/// A cast entry: `{"name": "Sam Worthington", "order": 0, ...}`
///
/// The list is already sorted by billing order, so `order` is informational
/// and list position decides who counts as top-billed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CastEntry {
    pub name: String,
    #[serde(default)]
    pub order: Option<u32>,
}

/// A crew entry: `{"job": "Director", "name": "James Cameron", ...}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrewEntry {
    pub name: String,
    pub job: String,
}

// =============================================================================
// Raw CSV Rows
// =============================================================================

/// The columns we read from `tmdb_5000_movies.csv`.
///
/// The CSV reader maps an empty cell to `None`, which is how a missing
/// value shows up.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieRow {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
}

/// The columns we read from `tmdb_5000_credits.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditRow {
    /// A value that is not a number is treated like an empty cell
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub movie_id: Option<MovieId>,
    pub title: Option<String>,
    pub cast: Option<String>,
    pub crew: Option<String>,
}

/// One movie row matched with one credits row sharing its title.
#[derive(Debug, Clone, Default)]
pub struct JoinedRow {
    pub movie_id: Option<MovieId>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
    pub cast: Option<String>,
    pub crew: Option<String>,
}
