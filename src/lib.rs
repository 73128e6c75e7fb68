/// This crate is a concurrent TF-IDF indexing and cosine similarity search engine.
pub mod config;
pub mod error;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Search Engine
/// The top-level struct of this crate.
/// It ingests a batch corpus, computes TF-IDF vectors over it and answers
/// ranked cosine similarity queries.
///
/// Internally, it holds:
/// - The corpus of tokenized documents
/// - The IDF table
/// - A TF-IDF vector and its norm per document
/// - A bounded worker pool shared by every concurrent stage
///
/// `SearchEngine<E>` is generic over the weighting engine `E`
/// (default: `DefaultTFIDFEngine`).
///
/// # Lifecycle
/// construct → `load_from_directory` / `index_documents` → `compute_index` → `search`.
/// Ingesting after `compute_index` leaves the index stale until it is recomputed.
///
/// # Examples
/// ```
/// use tfidf_search::SearchEngine;
///
/// let mut engine = SearchEngine::new(4).unwrap();
/// engine.index_documents(&["cat dog", "dog dog fish"]).unwrap();
/// engine.compute_index();
///
/// let hits = engine.search("dog");
/// assert_eq!(hits.ids(), vec![1, 0]);
/// ```
pub use vectorizer::SearchEngine;

/// Sparse TF-IDF vector of one document together with its L2 norm,
/// and the corpus-wide IDF table.
pub use vectorizer::{IDFVector, TFIDFVector};

/// TF-IDF Calculation Engine Trait
/// Defines the IDF formula and the term-frequency denominators used on the
/// document and the query side.
/// `DefaultTFIDFEngine` uses `ln(1 + N / df)`, distinct-term counts for
/// documents and raw token counts for queries.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Document and append-only corpus store.
pub use vectorizer::corpus::{Corpus, DocId, Document};

/// Term Frequency structure
/// Raw per-term occurrence counts of one document or query.
pub use vectorizer::term::TermFrequency;

/// Tokenizer and stopword set.
pub use vectorizer::token::{Preprocessor, StopWords};

/// Search Hits and Hit Entry structures
/// - `Hits`: ranked list of results
/// - `HitEntry`: a document id and its cosine score
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Weighted query vector.
pub use vectorizer::evaluate::query::QueryVector;

pub use config::EngineConfig;
pub use error::{EngineError, Result};

/// Bounded concurrency primitives.
pub use utils::pool::{Semaphore, SemaphorePermit, WorkerPool};
