//! TextNormalizer implementations.

use crate::traits::TextNormalizer;
use rust_stemmers::{Algorithm, Stemmer};
use std::borrow::Cow;

/// Suffix-stripping stemmer for English (Porter family, Snowball "english").
///
/// Expects lowercase input; "running" -> "run", "jumps" -> "jump".
pub struct PorterNormalizer {
    stemmer: Stemmer,
}

impl PorterNormalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for PorterNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PorterNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorterNormalizer").finish()
    }
}

impl TextNormalizer for PorterNormalizer {
    fn name(&self) -> &str {
        "porter"
    }

    fn stem_token<'a>(&self, token: &'a str) -> Cow<'a, str> {
        self.stemmer.stem(token)
    }
}

/// Leaves every token unchanged; only whitespace is collapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl TextNormalizer for IdentityNormalizer {
    fn name(&self) -> &str {
        "identity"
    }

    fn stem_token<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porter_stems_common_suffixes() {
        let normalizer = PorterNormalizer::new();
        assert_eq!(normalizer.stem_token("running"), "run");
        assert_eq!(normalizer.stem_token("jumps"), "jump");
    }

    #[test]
    fn test_stem_rejoins_with_single_spaces() {
        let normalizer = PorterNormalizer::new();
        assert_eq!(normalizer.stem("  running\tjumps \n"), "run jump");
    }

    #[test]
    fn test_stem_empty_input() {
        let normalizer = PorterNormalizer::new();
        assert_eq!(normalizer.stem(""), "");
        assert_eq!(normalizer.stem("   "), "");
    }

    #[test]
    fn test_stem_is_deterministic() {
        let normalizer = PorterNormalizer::new();
        let text = "a marine dispatched to the moon pandora on a unique mission";
        assert_eq!(normalizer.stem(text), normalizer.stem(text));
    }

    #[test]
    fn test_identity_keeps_tokens() {
        assert_eq!(IdentityNormalizer.stem("keep   these words"), "keep these words");
    }
}
