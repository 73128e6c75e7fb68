use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::{EngineError, Result};
use crate::vectorizer::corpus::{DocId, Document};
use crate::vectorizer::tfidf::TFIDFEngine;
use crate::vectorizer::{SearchEngine, PROGRESS_INTERVAL};

impl<E> SearchEngine<E>
where
    E: TFIDFEngine + Send + Sync,
{
    /// Load every file with the configured extension from `dir_path`.
    ///
    /// Files are listed in file-name order and the file at position `i` gets
    /// identifier `next_id + i`. Reading and tokenizing run as one task per
    /// file on the worker pool, so documents land in the corpus in no
    /// particular order while their identifiers stay deterministic.
    ///
    /// If any file cannot be read the whole load fails with that error and
    /// nothing is added to the corpus.
    pub fn load_from_directory(&mut self, dir_path: impl AsRef<Path>) -> Result<()> {
        let dir_path = dir_path.as_ref();
        let start = Instant::now();
        info!(path = %dir_path.display(), "loading documents");

        let files = list_files(dir_path, &self.config.file_extension)?;
        let file_num = files.len();
        info!(file_num, "found text files");

        let base = self.corpus.next_id();
        let preprocessor = &self.preprocessor;
        let outcomes: Vec<(DocId, Result<Vec<String>>)> =
            self.pool.map(files.into_iter().enumerate(), |(pos, path)| {
                let id = base + pos;
                let tokens = match fs::read(&path) {
                    Ok(content) => Ok(preprocessor.tokenize(&String::from_utf8_lossy(&content))),
                    Err(source) => {
                        error!(path = %path.display(), %source, "error reading file");
                        Err(EngineError::ReadFile { path, source })
                    }
                };
                if pos % PROGRESS_INTERVAL == 0 {
                    debug!(doc_id = id, file_num, "processed document");
                }
                (id, tokens)
            });

        let mut documents = Vec::with_capacity(file_num);
        let mut failure: Option<(DocId, EngineError)> = None;
        for (id, outcome) in outcomes {
            match outcome {
                Ok(tokens) => documents.push(Document { id, tokens }),
                // lowest listing position wins
                Err(err) => {
                    let lower = failure
                        .as_ref()
                        .map_or(true, |(failed_id, _)| id < *failed_id);
                    if lower {
                        failure = Some((id, err));
                    }
                }
            }
        }
        if let Some((_, err)) = failure {
            warn!(discarded = documents.len(), "directory load aborted");
            return Err(err);
        }

        self.corpus.reserve_ids(file_num);
        self.corpus.append(documents);
        info!(file_num, elapsed = ?start.elapsed(), "documents loaded");
        Ok(())
    }

    /// Ingest raw texts in input order; the text at position `i` gets
    /// identifier `next_id + i`. Never fails.
    pub fn index_documents<T>(&mut self, texts: &[T]) -> Result<()>
    where
        T: AsRef<str>,
    {
        info!(doc_num = texts.len(), "indexing documents");
        let base = self.corpus.reserve_ids(texts.len());
        let mut documents = Vec::with_capacity(texts.len());
        for (pos, text) in texts.iter().enumerate() {
            let id = base + pos;
            documents.push(Document {
                id,
                tokens: self.preprocessor.tokenize(text.as_ref()),
            });
            if pos % PROGRESS_INTERVAL == 0 {
                debug!(doc_id = id, doc_num = texts.len(), "processed document");
            }
        }
        self.corpus.append(documents);
        Ok(())
    }
}

/// Entries of `dir` whose name ends with `.extension`, sorted by path
///
/// Only directories are skipped. Symlinks are not followed here, so a link
/// that cannot be read is listed and fails at the read step.
fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let read_dir_err = |source| EngineError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_type().map_err(read_dir_err)?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn list_files_filters_and_sorts() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a.txt", "a");
        write(dir.path(), "c.md", "c");
        fs::create_dir(dir.path().join("d.txt")).unwrap();
        let files = list_files(dir.path(), "txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(list_files(dir.path(), ".md").unwrap().len(), 1);
    }

    #[test]
    fn bare_extension_name_is_listed() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".txt", "hidden");
        write(dir.path(), "atxt", "no dot");
        let files = list_files(dir.path(), "txt").unwrap();
        assert_eq!(files, vec![dir.path().join(".txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_fails_the_load() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("b.txt")).unwrap();

        assert_eq!(list_files(dir.path(), "txt").unwrap().len(), 2);
        let mut engine = SearchEngine::new(2).unwrap();
        let err = engine.load_from_directory(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::ReadFile { ref path, .. } if path.ends_with("b.txt")));
        assert_eq!(engine.doc_num(), 0);
        assert_eq!(engine.corpus().next_id(), 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut engine = SearchEngine::new(2).unwrap();
        let err = engine.load_from_directory(&missing).unwrap_err();
        assert!(matches!(err, EngineError::ReadDir { .. }));
    }

    #[test]
    fn ids_follow_listing_position() {
        let dir = tempdir().unwrap();
        write(dir.path(), "2.txt", "Third file");
        write(dir.path(), "0.txt", "First FILE");
        write(dir.path(), "1.txt", "second, file!");
        let mut engine = SearchEngine::new(2).unwrap();
        engine.load_from_directory(dir.path()).unwrap();
        assert_eq!(engine.doc_num(), 3);
        assert_eq!(engine.document(0).unwrap().tokens, vec!["first", "file"]);
        assert_eq!(engine.document(1).unwrap().tokens, vec!["second", "file"]);
        assert_eq!(engine.document(2).unwrap().tokens, vec!["third", "file"]);
    }

    #[test]
    fn index_documents_keeps_input_order() {
        let mut engine = SearchEngine::new(1).unwrap();
        engine.index_documents(&["b b", "a"]).unwrap();
        let ids: Vec<DocId> = engine.corpus().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1]);
        engine.index_documents(&["c"]).unwrap();
        assert_eq!(engine.document(2).unwrap().tokens, vec!["c"]);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.txt"), b"caf\xff ok").unwrap();
        let mut engine = SearchEngine::new(2).unwrap();
        engine.load_from_directory(dir.path()).unwrap();
        let tokens = &engine.document(0).unwrap().tokens;
        assert!(tokens.contains(&"ok".to_string()));
    }
}
