//! Integration tests for the feature pipeline.
//!
//! These tests run records through extraction and vectorization together
//! the way the index build does.

use data_loader::{MAX_BILLED_CAST, MovieRecord};
use features::{FeatureExtractor, IdentityNormalizer, StopWords, Vectorizer};

fn create_test_records() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new(1, "Space Saga")
            .with_overview("A pilot fights an empire across the galaxy.")
            .with_genres(["Science Fiction", "Adventure"])
            .with_keywords(["space opera", "rebellion"])
            .with_cast(["Mark Hamill", "Harrison Ford", "Carrie Fisher", "Peter Cushing"])
            .with_director("George Lucas"),
        MovieRecord::new(2, "Space Saga II")
            .with_overview("The pilots regroup after the empire strikes.")
            .with_genres(["Science Fiction", "Adventure"])
            .with_keywords(["space opera"])
            .with_cast(["Mark Hamill", "Harrison Ford"])
            .with_director("Irvin Kershner"),
        MovieRecord::new(3, "Empty"),
    ]
}

#[test]
fn test_records_to_vectors() {
    let records = create_test_records();
    let tags = FeatureExtractor::default().extract_all(&records);
    let (vocabulary, vectors) = Vectorizer::default().fit_transform(&tags);

    assert_eq!(vectors.len(), records.len());
    assert!(vectors.iter().all(|v| v.dim() == vocabulary.len()));

    // Compressed multi-word names survive as single terms
    assert!(vocabulary.contains("markhamil"));
    assert!(vocabulary.contains("spaceopera"));

    // The shared genre term is counted once per movie that has it
    let column = vocabulary.index_of("sciencefict").unwrap();
    assert_eq!(vectors[0].count(column), 1);
    assert_eq!(vectors[1].count(column), 1);
}

#[test]
fn test_empty_movie_gets_zero_vector() {
    let records = create_test_records();
    let tags = FeatureExtractor::default().extract_all(&records);
    let (_, vectors) = Vectorizer::default().fit_transform(&tags);

    assert!(tags[2].is_empty());
    assert!(vectors[2].is_zero());
}

#[test]
fn test_fourth_billed_actor_never_appears() {
    let records = create_test_records();
    let extractor = FeatureExtractor::new(IdentityNormalizer);
    for record in &records {
        assert!(record.cast.len() <= MAX_BILLED_CAST);
        let tags = extractor.extract_tags(record);
        assert!(!tags.tokens().iter().any(|t| t == "petercushing"));
    }
}

#[test]
fn test_vocabulary_cap_and_stop_words() {
    let records = create_test_records();
    let tags = FeatureExtractor::default().extract_all(&records);
    let stop_words = StopWords::english();

    for cap in [0, 1, 5, 5000] {
        let vocabulary = Vectorizer::new(cap).fit(&tags);
        assert!(vocabulary.len() <= cap);
        assert!(vocabulary.terms().iter().all(|t| !stop_words.contains(t)));
    }
}

#[test]
fn test_fit_is_deterministic() {
    let records = create_test_records();
    let extractor = FeatureExtractor::default();
    let vectorizer = Vectorizer::new(8);

    let first = vectorizer.fit_transform(&extractor.extract_all(&records));
    let second = vectorizer.fit_transform(&extractor.extract_all(&records));
    assert_eq!(first, second);
}
