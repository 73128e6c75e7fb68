use crate::vectorizer::term::TermFrequency;

/// TF-IDF weighting strategy
///
/// `SearchEngine<E>` calls these at the IDF stage, the vector stage and when
/// building query vectors. Implementations must be pure; they are called from
/// worker threads.
pub trait TFIDFEngine {
    /// IDF of a term
    /// # Arguments
    /// * `doc_num` - total number of documents N
    /// * `doc_freq` - number of documents containing the term, at least 1
    fn idf(doc_num: u64, doc_freq: u64) -> f64;

    /// Denominator normalising a document's term counts
    fn document_tf_denominator(freq: &TermFrequency) -> f64;

    /// Denominator normalising a query's term counts
    /// # Arguments
    /// * `freq` - stopword-filtered counts
    /// * `token_num` - query length before stopword removal
    fn query_tf_denominator(freq: &TermFrequency, token_num: usize) -> f64;

    /// Weight of one term given its count, denominator and IDF
    #[inline]
    fn weight(count: u32, denominator: f64, idf: f64) -> f64 {
        if denominator <= 0.0 {
            return 0.0;
        }
        (count as f64 / denominator) * idf
    }
}

/// Default TF-IDF engine
///
/// - idf = ln(1 + N / df)
/// - document tf = count / number of distinct terms in the document
/// - query tf = count / number of query tokens, stopwords included
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / doc_freq as f64).ln_1p()
    }

    #[inline]
    fn document_tf_denominator(freq: &TermFrequency) -> f64 {
        freq.distinct_term_count() as f64
    }

    #[inline]
    fn query_tf_denominator(_freq: &TermFrequency, token_num: usize) -> f64 {
        token_num as f64
    }
}
