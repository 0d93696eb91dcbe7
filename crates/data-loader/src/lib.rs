//! # Data Loader Crate
//!
//! This crate loads the TMDB 5000 dataset (movies + credits) into an
//! ordered catalog of validated movie records.
//!
//! ## Main Components
//!
//! - **types**: Domain types (MovieRecord), sub-record schema, raw CSV rows
//! - **parser**: Read the CSV files, join them on title, validate rows
//! - **catalog**: MovieCatalog, the corpus ordering shared by every later stage
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::MovieCatalog;
//! use std::path::Path;
//!
//! let catalog = MovieCatalog::load_from_files(Path::new("data/tmdb"))?;
//! let position = catalog.position_of_title("Avatar").unwrap();
//! println!("{:?}", catalog.get(position));
//! ```

// Public modules
pub mod catalog;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use catalog::{CREDITS_FILE, MOVIES_FILE, MovieCatalog};
pub use error::{DataLoadError, RecordRejection, Result};
pub use types::{MAX_BILLED_CAST, MovieId, MovieRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let catalog = MovieCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.get(0).is_none());
        assert!(catalog.position_of_title("Anything").is_none());
    }

    #[test]
    fn test_record_builder_truncates_cast() {
        let record = MovieRecord::new(1, "Heat")
            .with_cast(["Al Pacino", "Robert De Niro", "Val Kilmer", "Jon Voight"])
            .with_director("Michael Mann");

        assert_eq!(record.cast.len(), MAX_BILLED_CAST);
        assert_eq!(record.director.as_deref(), Some("Michael Mann"));
    }
}
