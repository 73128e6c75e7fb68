pub mod corpus;
pub mod evaluate;
pub mod term;
pub mod tfidf;
pub mod token;

use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::utils::math::vector::l2_norm;
use crate::utils::pool::WorkerPool;
use crate::vectorizer::corpus::{Corpus, DocId, Document};
use crate::vectorizer::term::TermFrequency;
use crate::vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};
use crate::vectorizer::token::Preprocessor;

/// Documents between two progress log lines
const PROGRESS_INTERVAL: usize = 100;

/// TF-IDF search engine
///
/// Lifecycle: construct → ingest (`load_from_directory` / `index_documents`)
/// → `compute_index` → `search` any number of times.
///
/// Ingestion and indexing take `&mut self` and searching takes `&self`, so a
/// search can never overlap an indexing pass on the same engine.
#[derive(Debug)]
pub struct SearchEngine<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine + Send + Sync,
{
    config: EngineConfig,
    preprocessor: Preprocessor,
    pool: WorkerPool,
    /// ingested documents
    corpus: Corpus,
    /// IDF table of the last index pass
    idf: IDFVector,
    /// TF-IDF vector and norm per document, ordered by id
    index: IndexMap<DocId, TFIDFVector>,
    /// corpus generation the index was computed from
    indexed_generation: Option<u64>,
    _marker: std::marker::PhantomData<E>,
}

/// Corpus-wide IDF table
#[derive(Debug, Clone, Default)]
pub struct IDFVector {
    /// term -> idf
    pub idf_vec: IndexMap<String, f64>,
    /// document count N the table was computed with
    pub doc_num: u64,
}

impl IDFVector {
    pub fn new() -> Self {
        Self {
            idf_vec: IndexMap::new(),
            doc_num: 0,
        }
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.idf_vec.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.idf_vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf_vec.is_empty()
    }
}

/// A document's sparse TF-IDF weights with their L2 norm
///
/// Both are produced by one call from one term table, so they never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TFIDFVector {
    /// term -> weight, one entry per distinct non-stopword term
    pub weights: IndexMap<String, f64>,
    pub norm: f64,
}

impl TFIDFVector {
    pub fn from_term_frequency<E>(freq: &TermFrequency, idf: &IDFVector) -> Self
    where
        E: TFIDFEngine,
    {
        let denominator = E::document_tf_denominator(freq);
        let weights: IndexMap<String, f64> = freq
            .iter()
            .map(|(term, count)| {
                let idf = idf.get(term).unwrap_or(0.0);
                (term.to_string(), E::weight(count, denominator, idf))
            })
            .collect();
        let norm = l2_norm(weights.values().copied());
        Self { weights, norm }
    }

    #[inline]
    pub fn weight(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }
}

impl SearchEngine<DefaultTFIDFEngine> {
    /// Create an engine with the default configuration and `max_workers` workers
    pub fn new(max_workers: usize) -> Result<Self> {
        Self::with_config(EngineConfig::default().with_max_workers(max_workers))
    }
}

impl<E> SearchEngine<E>
where
    E: TFIDFEngine + Send + Sync,
{
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.max_workers)?;
        Ok(Self {
            config,
            preprocessor: Preprocessor::new(),
            pool,
            corpus: Corpus::new(),
            idf: IDFVector::new(),
            index: IndexMap::new(),
            indexed_generation: None,
            _marker: std::marker::PhantomData,
        })
    }

    /// Build the IDF table, TF-IDF vectors and norms over the whole corpus.
    ///
    /// Stages, each finishing before the next starts:
    /// 1. term frequencies, one task per document
    /// 2. document frequencies, folded sequentially
    /// 3. IDF per term
    /// 4. TF-IDF vector and norm, one task per document
    ///
    /// Any previous index is replaced, so rerunning on an unchanged corpus
    /// yields the same tables.
    pub fn compute_index(&mut self) {
        let start = Instant::now();
        let doc_num = self.corpus.len();
        info!(doc_num, "calculating TF-IDF scores");

        let stop_words = &self.config.stop_words;
        let term_freqs: Vec<(DocId, TermFrequency)> =
            self.pool.map(self.corpus.iter(), |doc: &Document| {
                (doc.id, TermFrequency::from_tokens(&doc.tokens, stop_words))
            });
        debug!(elapsed = ?start.elapsed(), "term frequencies ready");

        let mut doc_freq: IndexMap<&str, u64> = IndexMap::new();
        for (_, freq) in &term_freqs {
            for term in freq.terms() {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = doc_num as u64;
        let idf_vec: IndexMap<String, f64> = doc_freq
            .iter()
            .map(|(term, &df)| (term.to_string(), E::idf(n, df)))
            .collect();
        drop(doc_freq);
        self.idf = IDFVector { idf_vec, doc_num: n };
        debug!(vocab_size = self.idf.len(), elapsed = ?start.elapsed(), "idf table ready");

        let index = RwLock::new(IndexMap::with_capacity(term_freqs.len()));
        let idf = &self.idf;
        self.pool.map(term_freqs, |(id, freq)| {
            let vector = TFIDFVector::from_term_frequency::<E>(&freq, idf);
            index.write().insert(id, vector);
            if id % PROGRESS_INTERVAL == 0 {
                debug!(doc_id = id, doc_num, "computed TF-IDF vector");
            }
        });
        let mut index = index.into_inner();
        index.sort_keys();
        self.index = index;
        self.indexed_generation = Some(self.corpus.generation());

        info!(doc_num, vocab_size = self.idf.len(), elapsed = ?start.elapsed(), "TF-IDF calculation completed");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Number of ingested documents
    pub fn doc_num(&self) -> usize {
        self.corpus.len()
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.corpus.get(id)
    }

    /// IDF of a term as of the last index pass
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term)
    }

    pub fn idf_table(&self) -> &IDFVector {
        &self.idf
    }

    /// TF-IDF vector and norm of a document as of the last index pass
    pub fn tfidf(&self, id: DocId) -> Option<&TFIDFVector> {
        self.index.get(&id)
    }

    /// Whether `compute_index` has run at least once
    pub fn is_indexed(&self) -> bool {
        self.indexed_generation.is_some()
    }

    /// Whether documents were ingested after the last index pass
    pub fn is_stale(&self) -> bool {
        match self.indexed_generation {
            Some(generation) => generation != self.corpus.generation(),
            None => !self.corpus.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(texts: &[&str]) -> SearchEngine {
        let mut engine = SearchEngine::new(4).unwrap();
        engine.index_documents(texts).unwrap();
        engine.compute_index();
        engine
    }

    #[test]
    fn vectors_hold_distinct_non_stop_terms() {
        let engine = engine_with(&["the cat and the dog", "dog dog fish"]);
        let v0 = engine.tfidf(0).unwrap();
        let mut terms: Vec<&str> = v0.weights.keys().map(String::as_str).collect();
        terms.sort_unstable();
        assert_eq!(terms, vec!["cat", "dog"]);
        let v1 = engine.tfidf(1).unwrap();
        assert_eq!(v1.weights.len(), 2);
    }

    #[test]
    fn norm_matches_weights() {
        let engine = engine_with(&["alpha beta beta gamma", "beta delta", "epsilon"]);
        for id in 0..3 {
            let v = engine.tfidf(id).unwrap();
            let expected = v.weights.values().map(|w| w * w).sum::<f64>().sqrt();
            assert!((v.norm - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn idf_follows_document_frequency() {
        let engine = engine_with(&["cat dog", "dog dog fish"]);
        assert!((engine.idf("dog").unwrap() - 2.0_f64.ln()).abs() < 1e-12);
        assert!((engine.idf("fish").unwrap() - 3.0_f64.ln()).abs() < 1e-12);
        assert!(engine.idf("fish").unwrap() > engine.idf("dog").unwrap());
        assert_eq!(engine.idf_table().doc_num, 2);
        assert!(engine.idf("the").is_none());
    }

    #[test]
    fn document_weights_use_distinct_term_denominator() {
        let engine = engine_with(&["cat dog", "dog dog fish"]);
        let v1 = engine.tfidf(1).unwrap();
        // dog: 2 occurrences over 2 distinct terms
        assert!((v1.weight("dog").unwrap() - 2.0_f64.ln()).abs() < 1e-12);
        assert!((v1.weight("fish").unwrap() - 3.0_f64.ln() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut engine = engine_with(&["one two", "two three", "three four four"]);
        let idf_before = engine.idf_table().idf_vec.clone();
        let vectors_before: Vec<TFIDFVector> =
            (0..3).map(|id| engine.tfidf(id).unwrap().clone()).collect();
        engine.compute_index();
        for (term, idf) in &idf_before {
            assert_eq!(engine.idf(term), Some(*idf));
        }
        assert_eq!(engine.idf_table().len(), idf_before.len());
        for (id, before) in vectors_before.iter().enumerate() {
            assert_eq!(engine.tfidf(id).unwrap(), before);
        }
    }

    #[test]
    fn stopword_only_document_has_zero_norm() {
        let engine = engine_with(&["the and of", "real words"]);
        let v0 = engine.tfidf(0).unwrap();
        assert!(v0.weights.is_empty());
        assert_eq!(v0.norm, 0.0);
    }

    #[test]
    fn empty_corpus_indexes_to_nothing() {
        let mut engine = SearchEngine::new(2).unwrap();
        assert!(!engine.is_indexed());
        assert!(!engine.is_stale());
        engine.compute_index();
        assert!(engine.is_indexed());
        assert!(engine.idf_table().is_empty());
        assert!(engine.tfidf(0).is_none());
    }

    #[test]
    fn ingesting_after_index_marks_stale() {
        let mut engine = engine_with(&["a first doc"]);
        assert!(!engine.is_stale());
        engine.index_documents(&["second doc"]).unwrap();
        assert!(engine.is_stale());
        engine.compute_index();
        assert!(!engine.is_stale());
        assert_eq!(engine.idf_table().doc_num, 2);
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(SearchEngine::new(0).is_err());
    }
}
