use indexmap::IndexMap;

use crate::vectorizer::token::StopWords;

/// TermFrequency struct
/// Raw occurrence counts of terms within one document or query.
/// Terms keep first-occurrence order.
///
/// # Examples
/// ```
/// use tfidf_search::vectorizer::term::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("term1");
/// term_freq.add_term("term2");
/// term_freq.add_term("term1");
///
/// assert_eq!(term_freq.term_count("term1"), 2);
/// assert_eq!(term_freq.distinct_term_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// Adding terms
impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// Count the non-stopword tokens of a token sequence
    ///
    /// # Arguments
    /// * `tokens` - tokens in occurrence order
    /// * `stop_words` - terms to skip
    pub fn from_tokens<T>(tokens: &[T], stop_words: &StopWords) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        for token in tokens {
            let token = token.as_ref();
            if !stop_words.contains(token) {
                freq.add_term(token);
            }
        }
        freq
    }

    /// Add a term
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        match self.term_count.get_mut(term) {
            Some(count) => *count += 1,
            None => {
                self.term_count.insert(term.to_string(), 1);
            }
        }
        self.total_term_count += 1;
        self
    }

    /// Add multiple terms
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }
}

/// Statistics
impl TermFrequency {
    /// Count of a term, 0 if absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    #[inline]
    pub fn distinct_term_count(&self) -> usize {
        self.term_count.len()
    }

    /// Sum of all counts
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// (term, count) pairs in first-occurrence order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Distinct terms in first-occurrence order
    #[inline]
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.term_count.keys().map(String::as_str)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tokens_skips_stop_words() {
        let tokens = ["the", "dog", "and", "the", "dog", "fish"];
        let freq = TermFrequency::from_tokens(&tokens, &StopWords::default());
        assert_eq!(freq.term_count("dog"), 2);
        assert_eq!(freq.term_count("fish"), 1);
        assert_eq!(freq.term_count("the"), 0);
        assert_eq!(freq.distinct_term_count(), 2);
        assert_eq!(freq.term_sum(), 3);
        assert_eq!(freq.terms().collect::<Vec<_>>(), vec!["dog", "fish"]);
    }

    #[test]
    fn all_stop_words_is_empty() {
        let freq = TermFrequency::from_tokens(&["the", "a", "of"], &StopWords::default());
        assert!(freq.is_empty());
        assert_eq!(freq.term_sum(), 0);
    }

    #[test]
    fn add_terms_accumulates() {
        let mut freq = TermFrequency::new();
        freq.add_terms(&["x", "y"]).add_term("x");
        assert_eq!(freq.iter().collect::<Vec<_>>(), vec![("x", 2), ("y", 1)]);
        assert!(freq.contains_term("y"));
        assert!(!freq.contains_term("z"));
    }
}
