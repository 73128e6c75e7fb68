use std::fmt::{self, Debug, Display};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::utils::math::vector::{cosine, sparse_dot};
use crate::vectorizer::corpus::DocId;
use crate::vectorizer::tfidf::TFIDFEngine;
use crate::vectorizer::SearchEngine;

/// A single search result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEntry {
    pub id: DocId,
    pub score: f64,
}

/// Structure to store search results
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Drop every hit whose score is not a positive finite number
    pub fn retain_positive(&mut self) -> &mut Self {
        self.list.retain(|hit| hit.score.is_finite() && hit.score > 0.0);
        self
    }

    /// Sort results by descending score
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|hit| !hit.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Keep at most `limit` leading hits
    pub fn truncate(&mut self, limit: usize) -> &mut Self {
        self.list.truncate(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry> {
        self.list.iter()
    }

    /// Document ids in result order
    pub fn ids(&self) -> Vec<DocId> {
        self.list.iter().map(|hit| hit.id).collect()
    }

    pub fn into_vec(self) -> Vec<HitEntry> {
        self.list
    }
}

impl IntoIterator for Hits {
    type Item = HitEntry;
    type IntoIter = std::vec::IntoIter<HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Hits {
    type Item = &'a HitEntry;
    type IntoIter = std::slice::Iter<'a, HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {}: {:.6}", hit.id, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>4}. doc {} ({:.6})", rank + 1, hit.id, hit.score)?;
        }
        Ok(())
    }
}

impl<E> SearchEngine<E>
where
    E: TFIDFEngine + Send + Sync,
{
    /// Rank every indexed document by cosine similarity to `query`.
    ///
    /// Documents are scored concurrently, one task per document. Only
    /// documents with a positive score are returned, highest first. An empty
    /// or all-stopword query returns no hits.
    pub fn search(&self, query: &str) -> Hits {
        let start = Instant::now();
        info!(query, "searching");
        if self.is_stale() {
            warn!(
                doc_num = self.corpus.len(),
                indexed = self.index.len(),
                "searching a stale index, documents ingested since the last compute_index are not visible"
            );
        }

        let query_vec = self.query_vector(query);
        if query_vec.is_empty() {
            debug!(token_num = query_vec.token_num, "query has no indexed terms");
            return Hits::default();
        }

        let query_vec = &query_vec;
        let scored: Vec<Option<HitEntry>> = self.pool.map(self.index.iter(), |(&id, doc_vec)| {
            let dot = sparse_dot(&query_vec.weights, &doc_vec.weights);
            cosine(dot, query_vec.norm, doc_vec.norm).map(|score| HitEntry { id, score })
        });

        let mut hits = Hits::new(scored.into_iter().flatten().collect());
        hits.retain_positive().sort_by_score();
        info!(hit_num = hits.len(), elapsed = ?start.elapsed(), "search completed");
        hits
    }

    /// `search` truncated to the `limit` best hits
    pub fn search_top(&self, query: &str, limit: usize) -> Hits {
        let mut hits = self.search(query);
        hits.truncate(limit);
        hits
    }
}
