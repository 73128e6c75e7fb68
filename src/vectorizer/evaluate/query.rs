use indexmap::IndexMap;

use crate::utils::math::vector::l2_norm;
use crate::vectorizer::term::TermFrequency;
use crate::vectorizer::tfidf::TFIDFEngine;
use crate::vectorizer::{IDFVector, SearchEngine};

/// Weighted query, built per search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryVector {
    /// term -> weight, only terms known to the IDF table
    pub weights: IndexMap<String, f64>,
    pub norm: f64,
    /// query length before stopword removal
    pub token_num: usize,
}

impl QueryVector {
    /// Weight query tokens against an IDF table
    ///
    /// Terms missing from `idf` are dropped, not given a zero weight.
    pub fn build<E, T>(tokens: &[T], freq: &TermFrequency, idf: &IDFVector) -> Self
    where
        E: TFIDFEngine,
        T: AsRef<str>,
    {
        let denominator = E::query_tf_denominator(freq, tokens.len());
        let weights: IndexMap<String, f64> = freq
            .iter()
            .filter_map(|(term, count)| {
                idf.get(term)
                    .map(|idf| (term.to_string(), E::weight(count, denominator, idf)))
            })
            .collect();
        let norm = l2_norm(weights.values().copied());
        Self {
            weights,
            norm,
            token_num: tokens.len(),
        }
    }

    /// No term of the query carries weight
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty() || self.norm <= 0.0
    }
}

impl<E> SearchEngine<E>
where
    E: TFIDFEngine + Send + Sync,
{
    /// Tokenize and weight a raw query against the current IDF table
    pub fn query_vector(&self, query: &str) -> QueryVector {
        let tokens = self.preprocessor.tokenize(query);
        let freq = TermFrequency::from_tokens(&tokens, &self.config.stop_words);
        QueryVector::build::<E, _>(&tokens, &freq, &self.idf)
    }
}
