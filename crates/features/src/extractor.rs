//! Tag extraction: one movie record in, one normalized token sequence out.

use crate::normalizer::PorterNormalizer;
use crate::traits::TextNormalizer;
use data_loader::{MAX_BILLED_CAST, MovieRecord};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// The flattened, normalized content fingerprint of one movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSequence {
    tokens: Vec<String>,
}

impl TagSequence {
    /// Split already-normalized text on whitespace.
    pub fn from_text(text: &str) -> Self {
        Self {
            tokens: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined with single spaces
    pub fn as_text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Builds tag sequences from movie records.
///
/// Token order is fixed: overview words, then genres, keywords, billed
/// cast and director. Names are compressed into single tokens first so
/// "Science Fiction" becomes "sciencefiction" and never collides with the
/// overview word "fiction".
#[derive(Clone)]
pub struct FeatureExtractor {
    normalizer: Arc<dyn TextNormalizer>,
}

impl FeatureExtractor {
    pub fn new(normalizer: impl TextNormalizer + 'static) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
        }
    }

    pub fn normalizer(&self) -> &dyn TextNormalizer {
        self.normalizer.as_ref()
    }

    /// Compute the tag sequence of a single record.
    pub fn extract_tags(&self, record: &MovieRecord) -> TagSequence {
        let names = record
            .genres
            .iter()
            .chain(&record.keywords)
            .chain(record.cast.iter().take(MAX_BILLED_CAST))
            .chain(&record.director)
            .map(|name| compress_name(name));

        let tokens: Vec<String> = record
            .overview
            .split_whitespace()
            .map(str::to_string)
            .chain(names)
            .collect();

        let text = tokens.join(" ").to_lowercase();
        TagSequence::from_text(&self.normalizer.stem(&text))
    }

    /// Tag sequences for every record, in parallel, in input order.
    pub fn extract_all(&self, records: &[MovieRecord]) -> Vec<TagSequence> {
        debug!(
            "Extracting tags for {} records with {} normalizer",
            records.len(),
            self.normalizer.name()
        );
        records
            .par_iter()
            .map(|record| self.extract_tags(record))
            .collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(PorterNormalizer::new())
    }
}

/// "Sam Worthington" -> "SamWorthington"
fn compress_name(name: &str) -> String {
    name.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::IdentityNormalizer;

    fn avatar() -> MovieRecord {
        MovieRecord::new(19995, "Avatar")
            .with_overview("A paraplegic Marine on Pandora.")
            .with_genres(["Action", "Science Fiction"])
            .with_keywords(["culture clash", "future"])
            .with_cast(["Sam Worthington", "Zoe Saldana", "Sigourney Weaver"])
            .with_director("James Cameron")
    }

    #[test]
    fn test_tag_order_and_name_compression() {
        let extractor = FeatureExtractor::new(IdentityNormalizer);
        let tags = extractor.extract_tags(&avatar());

        assert_eq!(
            tags.as_text(),
            "a paraplegic marine on pandora. action sciencefiction cultureclash future \
             samworthington zoesaldana sigourneyweaver jamescameron"
        );
    }

    #[test]
    fn test_cast_capped_even_when_record_is_not() {
        let mut record = MovieRecord::new(1, "Ensemble");
        record.cast = vec!["A A".into(), "B B".into(), "C C".into(), "D D".into()];

        let tags = FeatureExtractor::new(IdentityNormalizer).extract_tags(&record);
        assert_eq!(tags.tokens(), ["aa", "bb", "cc"]);
    }

    #[test]
    fn test_missing_director_adds_nothing() {
        let record = MovieRecord::new(1, "Untitled").with_genres(["Drama"]);
        let tags = FeatureExtractor::new(IdentityNormalizer).extract_tags(&record);
        assert_eq!(tags.tokens(), ["drama"]);
    }

    #[test]
    fn test_empty_record_gives_empty_tags() {
        let tags = FeatureExtractor::default().extract_tags(&MovieRecord::new(1, "Void"));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_porter_stems_after_lowercasing() {
        let record = MovieRecord::new(1, "Runner").with_overview("RUNNING Jumps");
        let tags = FeatureExtractor::default().extract_tags(&record);
        assert_eq!(tags.tokens(), ["run", "jump"]);
    }

    #[test]
    fn test_extract_all_preserves_order() {
        let records = vec![
            MovieRecord::new(1, "One").with_genres(["Horror"]),
            MovieRecord::new(2, "Two").with_genres(["Comedy"]),
        ];
        let tags = FeatureExtractor::new(IdentityNormalizer).extract_all(&records);
        assert_eq!(tags[0].tokens(), ["horror"]);
        assert_eq!(tags[1].tokens(), ["comedy"]);
    }
}
