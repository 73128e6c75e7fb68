//! Error types for the search engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by engine construction and corpus ingestion.
///
/// Queries never fail: an empty or all-stopword query simply yields no hits,
/// and degenerate norms exclude a document instead of raising.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The ingestion directory could not be listed
    #[error("error finding text files in {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A single document file could not be read; the whole load is aborted
    #[error("error reading file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Rejected engine configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The worker thread pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
