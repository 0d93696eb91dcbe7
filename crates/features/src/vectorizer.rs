//! Vocabulary fitting and count-vector encoding.
//!
//! ## Analyzer
//! Each tag token is split into runs of word characters (alphanumeric or
//! `_`) and runs shorter than two characters are dropped, so trailing
//! punctuation on overview words ("pandora.") never reaches the vocabulary.
//! Stop words are removed after that split.
//!
//! ## Vocabulary order
//! Terms are ranked by total count across the corpus; equal counts keep the
//! order in which the terms were first seen (document order, then token
//! order). The rank is the column index.

use crate::extractor::TagSequence;
use crate::stopwords::StopWords;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Default vocabulary size
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Term -> column mapping, fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Vocabulary whose columns follow `terms`. A repeated term keeps its first column.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::default();
        for term in terms {
            let term = term.into();
            if vocabulary.index.contains_key(&term) {
                continue;
            }
            vocabulary.index.insert(term.clone(), vocabulary.terms.len());
            vocabulary.terms.push(term);
        }
        vocabulary
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }
}

/// Token counts of one movie over a vocabulary.
///
/// Stored sparsely: `(column, count)` pairs sorted by column, counts > 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, u32)>,
}

impl FeatureVector {
    /// Build from a dense count slice
    pub fn from_dense(counts: &[u32]) -> Self {
        Self {
            dim: counts.len(),
            entries: counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(column, count)| (column, *count))
                .collect(),
        }
    }

    /// All-zero vector of length `dim`
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Vector length (= vocabulary size)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Non-zero `(column, count)` pairs, sorted by column
    pub fn entries(&self) -> &[(usize, u32)] {
        &self.entries
    }

    pub fn count(&self, column: usize) -> u32 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_dense(&self) -> Vec<u32> {
        let mut dense = vec![0; self.dim];
        for &(column, count) in &self.entries {
            dense[column] = count;
        }
        dense
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        let squares: u64 = self
            .entries
            .iter()
            .map(|(_, count)| u64::from(*count) * u64::from(*count))
            .sum();
        (squares as f64).sqrt()
    }

    /// Dot product; walks both sorted entry lists once.
    pub fn dot(&self, other: &FeatureVector) -> u64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0u64;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_col, a_count) = self.entries[i];
            let (b_col, b_count) = other.entries[j];
            match a_col.cmp(&b_col) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += u64::from(a_count) * u64::from(b_count);
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fits a vocabulary over tag sequences and encodes them as count vectors.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    max_features: usize,
    stop_words: StopWords,
}

impl Vectorizer {
    /// Vectorizer with the English stop list and a vocabulary cap.
    ///
    /// A cap of 0 gives an empty vocabulary and all-zero vectors.
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            stop_words: StopWords::english(),
        }
    }

    /// Replace the stop list (builder pattern)
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Terms of a tag sequence as the vocabulary sees them, stop words removed.
    pub fn analyze<'a>(&self, tags: &'a TagSequence) -> Vec<&'a str> {
        tags.tokens()
            .iter()
            .flat_map(|token| token.split(|c: char| !(c.is_alphanumeric() || c == '_')))
            .filter(|term| term.chars().nth(1).is_some())
            .filter(|term| !self.stop_words.contains(term))
            .collect()
    }

    /// Build the vocabulary from the whole corpus.
    pub fn fit(&self, corpus: &[TagSequence]) -> Vocabulary {
        // term -> (total count, first-seen rank)
        let mut counts: HashMap<&str, (u64, usize)> = HashMap::new();
        for tags in corpus {
            for term in self.analyze(tags) {
                let next_rank = counts.len();
                counts.entry(term).or_insert((0, next_rank)).0 += 1;
            }
        }
        let distinct = counts.len();

        let mut ranked: Vec<(&str, u64, usize)> = counts
            .into_iter()
            .map(|(term, (count, first_seen))| (term, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(self.max_features);

        let vocabulary = Vocabulary::from_terms(ranked.into_iter().map(|(term, _, _)| term));
        info!(
            "Fitted vocabulary: {} terms kept of {} distinct (cap {})",
            vocabulary.len(),
            distinct,
            self.max_features
        );
        vocabulary
    }

    /// Count vector of one tag sequence. Terms outside the vocabulary are ignored.
    pub fn transform(&self, tags: &TagSequence, vocabulary: &Vocabulary) -> FeatureVector {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for term in self.analyze(tags) {
            if let Some(column) = vocabulary.index_of(term) {
                *counts.entry(column).or_insert(0) += 1;
            }
        }
        FeatureVector {
            dim: vocabulary.len(),
            entries: counts.into_iter().collect(),
        }
    }

    /// Count vectors for the whole corpus, in parallel, in input order.
    pub fn transform_all(&self, corpus: &[TagSequence], vocabulary: &Vocabulary) -> Vec<FeatureVector> {
        let vectors: Vec<FeatureVector> = corpus
            .par_iter()
            .map(|tags| self.transform(tags, vocabulary))
            .collect();
        debug!(
            "Encoded {} vectors, {} all-zero",
            vectors.len(),
            vectors.iter().filter(|v| v.is_zero()).count()
        );
        vectors
    }

    /// `fit` followed by `transform_all`
    pub fn fit_transform(&self, corpus: &[TagSequence]) -> (Vocabulary, Vec<FeatureVector>) {
        let vocabulary = self.fit(corpus);
        let vectors = self.transform_all(corpus, &vocabulary);
        (vocabulary, vectors)
    }
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}
