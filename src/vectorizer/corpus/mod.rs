pub mod ingest;

use indexmap::IndexMap;

/// Identifier assigned to a document at ingestion
pub type DocId = usize;

/// A tokenized document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    /// lowercase tokens in occurrence order, stopwords included
    pub tokens: Vec<String>,
}

/// Append-only document store
///
/// Documents are kept in the order they were appended, which for concurrent
/// directory loads is not identifier order. Identifiers are handed out from
/// `next_id` and never reused.
#[derive(Debug, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    /// id -> position in `documents`
    positions: IndexMap<DocId, usize>,
    /// next free identifier
    next_id: DocId,
    /// bumped on every append, compared against the index to detect staleness
    generation: u64,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            positions: IndexMap::new(),
            next_id: 0,
            generation: 0,
        }
    }

    /// Reserve `count` consecutive identifiers, returning the first one
    pub(crate) fn reserve_ids(&mut self, count: usize) -> DocId {
        let base = self.next_id;
        self.next_id += count;
        base
    }

    /// Commit a batch of documents
    pub(crate) fn append(&mut self, documents: Vec<Document>) {
        if documents.is_empty() {
            return;
        }
        self.positions.reserve(documents.len());
        for document in documents {
            self.positions.insert(document.id, self.documents.len());
            self.documents.push(document);
        }
        self.generation += 1;
    }

    /// Identifier the next ingested document will receive
    pub fn next_id(&self) -> DocId {
        self.next_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Look a document up by identifier
    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.positions.get(&id).map(|&pos| &self.documents[pos])
    }
}
