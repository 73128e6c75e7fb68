//! Engine configuration.
//!
//! Defaults: four workers, `*.txt` files and a short English stopword list.

use crate::error::{EngineError, Result};
use crate::vectorizer::token::StopWords;

/// Default number of concurrently running tasks per stage.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Default extension (without the dot) of files picked up by directory loads.
pub const DEFAULT_FILE_EXTENSION: &str = "txt";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of tasks running at once in any concurrent stage
    pub max_workers: usize,
    /// Extension matched by `load_from_directory`, compared case-sensitively
    pub file_extension: String,
    /// Terms excluded from frequency tables and weights
    pub stop_words: StopWords,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            stop_words: StopWords::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Check the configuration before an engine is built from it
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(EngineError::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        let extension = self.file_extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(EngineError::InvalidConfig(
                "file_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
