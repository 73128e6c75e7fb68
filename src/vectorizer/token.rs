use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of non-word characters separate tokens; word characters are ASCII only
static TOKEN_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9A-Za-z_]+").expect("token split pattern is valid")
});

/// Common English stopwords excluded from term statistics
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
    "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

/// Text preprocessor
///
/// Lowercases, splits on runs of non-word characters and drops empty
/// fragments. Stopwords are kept: callers filter them when building
/// frequency tables, because the query side needs the unfiltered length.
///
/// # Examples
/// ```
/// use tfidf_search::vectorizer::token::Preprocessor;
/// let tokens = Preprocessor::new().tokenize("Hello, World! It's  fine.");
/// assert_eq!(tokens, vec!["hello", "world", "it", "s", "fine"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Preprocessor
    }

    /// Split text into lowercase tokens in occurrence order
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_SPLIT
            .split(&lowered)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Set of terms ignored by frequency tables and weights
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<Box<str>>,
}

impl StopWords {
    pub fn new<I, T>(words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase().into_boxed_str())
                .collect(),
        }
    }

    /// No stopwords at all
    pub fn empty() -> Self {
        Self { words: HashSet::new() }
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits() {
        let p = Preprocessor::new();
        assert_eq!(
            p.tokenize("The Quick-brown FOX\tjumps...over_it"),
            vec!["the", "quick", "brown", "fox", "jumps", "over_it"]
        );
    }

    #[test]
    fn tokenize_degenerate_input() {
        let p = Preprocessor::new();
        assert!(p.tokenize("").is_empty());
        assert!(p.tokenize("  ,.;!? \n").is_empty());
        assert_eq!(p.tokenize("--a--"), vec!["a"]);
    }

    #[test]
    fn tokenize_splits_on_non_ascii_letters() {
        let p = Preprocessor::new();
        assert_eq!(p.tokenize("café naïve"), vec!["caf", "na", "ve"]);
        assert_eq!(p.tokenize("CAFÉ 東京 x1"), vec!["caf", "x1"]);
    }

    #[test]
    fn tokenize_keeps_stopwords_and_order() {
        let p = Preprocessor::new();
        assert_eq!(p.tokenize("dog and the dog"), vec!["dog", "and", "the", "dog"]);
    }

    #[test]
    fn default_stop_words() {
        let sw = StopWords::default();
        assert_eq!(sw.len(), DEFAULT_STOP_WORDS.len());
        assert!(sw.contains("the"));
        assert!(sw.contains("with"));
        assert!(!sw.contains("dog"));
    }

    #[test]
    fn custom_stop_words_are_lowercased() {
        let sw = StopWords::new(["Dog", "CAT"]);
        assert!(sw.contains("dog"));
        assert!(sw.contains("cat"));
        assert!(!sw.contains("the"));
        assert!(StopWords::empty().is_empty());
    }
}
