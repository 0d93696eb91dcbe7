//! Core traits for text normalization.
//!
//! The extractor only needs something that can stem a token, so the
//! stemming algorithm sits behind a trait.

use std::borrow::Cow;

/// Reduces tokens to a canonical form.
///
/// ## Design Note
/// - `Send + Sync` lets one normalizer be shared across rayon workers
/// - Implementations must be deterministic: the same token always maps to
///   the same output
pub trait TextNormalizer: Send + Sync {
    /// Returns the name of this normalizer (for logging/debugging)
    fn name(&self) -> &str;

    /// Normalize a single whitespace-free token.
    fn stem_token<'a>(&self, token: &'a str) -> Cow<'a, str>;

    /// Split on whitespace, normalize each token, rejoin with single spaces.
    ///
    /// Empty or all-whitespace input gives an empty string.
    fn stem(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| self.stem_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
