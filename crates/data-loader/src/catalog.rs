//! MovieCatalog loading and lookups.
//!
//! The catalog fixes the corpus ordering: a movie's position here is the
//! row it gets in every feature vector list and in the similarity matrix.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

/// File holding movie metadata
pub const MOVIES_FILE: &str = "tmdb_5000_movies.csv";

/// File holding cast and crew
pub const CREDITS_FILE: &str = "tmdb_5000_credits.csv";

/// Ordered, immutable list of validated movies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieCatalog {
    records: Vec<MovieRecord>,
}

impl MovieCatalog {
    /// Load the TMDB 5000 dataset from a directory
    ///
    /// Steps:
    /// 1. Parse both CSV files in parallel
    /// 2. Inner-join on title
    /// 3. Drop rows with missing or malformed fields
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading TMDB dataset from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let credits_path = data_dir.join(CREDITS_FILE);

        // Rayon's `join` runs the two parsers in parallel
        let (movies, credits) = rayon::join(
            || parser::parse_movie_rows(&movies_path),
            || parser::parse_credit_rows(&credits_path),
        );
        let movies = movies?;
        let credits = credits?;
        info!("Read {} movie rows and {} credit rows", movies.len(), credits.len());

        let joined = parser::join_on_title(movies, credits);
        let joined_count = joined.len();

        let records: Vec<MovieRecord> = joined
            .into_iter()
            .filter_map(|row| {
                let title = row.title.clone();
                match parser::into_record(row) {
                    Ok(record) => Some(record),
                    Err(reason) => {
                        debug!("Dropping {:?}: {}", title, reason);
                        None
                    }
                }
            })
            .collect();

        info!(
            "Catalog ready: {} movies ({} joined rows, {} dropped)",
            records.len(),
            joined_count,
            joined_count - records.len()
        );
        Ok(Self { records })
    }

    /// Build a catalog from records already in corpus order
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a corpus position
    pub fn get(&self, position: usize) -> Option<&MovieRecord> {
        self.records.get(position)
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.records.iter()
    }

    /// Position of the first movie whose title equals `title` exactly.
    ///
    /// Matching is case-sensitive. When two movies share a title the
    /// earlier one wins.
    pub fn position_of_title(&self, title: &str) -> Option<usize> {
        self.records.iter().position(|record| record.title == title)
    }

    /// Case-insensitive title search.
    ///
    /// Exact matches come first, then substring matches; within each group
    /// movies keep their corpus order.
    pub fn search(&self, fragment: &str) -> Vec<(usize, &MovieRecord)> {
        let needle = fragment.to_lowercase();
        let mut matches: Vec<(u8, usize, &MovieRecord)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let title = record.title.to_lowercase();
                if title == needle {
                    Some((0, position, record))
                } else if title.contains(&needle) {
                    Some((1, position, record))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by_key(|(rank, position, _)| (*rank, *position));
        matches
            .into_iter()
            .map(|(_, position, record)| (position, record))
            .collect()
    }
}
