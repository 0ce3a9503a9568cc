//! The in-memory search index facade.
//!
//! [`SearchIndex`] wires the analyzer, the dual posting structure, and the
//! document store together behind the public add / search / match / remove
//! operations. Mutation takes `&mut self` and reads take `&self`, so the
//! single-writer, many-reader discipline required of one index instance is
//! enforced by the borrow checker rather than by an internal lock.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::document::{DocId, DocumentData, DocumentStatus, DocumentStore, average_rating};
use crate::error::{CalamusError, Result};

pub(crate) mod postings;
mod searcher;

pub use searcher::{SCORE_EPSILON, SearchHit};

use postings::PostingIndex;

/// Default cap on the number of hits a search returns.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Execution strategy, selected per call.
///
/// Both strategies implement the same contract; parallel runs fan the work
/// out across the global rayon pool and may reorder floating-point
/// accumulation, which is bounded by the ranking tie epsilon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Single-threaded and fully deterministic.
    #[default]
    Sequential,
    /// Fan independent work units out across the rayon pool.
    Parallel,
}

/// Tuning knobs for a [`SearchIndex`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum number of hits a search returns.
    pub max_results: usize,

    /// Shard count for the parallel scoring accumulator.
    pub accumulator_shards: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            max_results: DEFAULT_MAX_RESULTS,
            accumulator_shards: num_cpus::get().max(1) * 2,
        }
    }
}

/// An in-memory document index with TF-IDF ranked keyword search.
///
/// Documents are added with a caller-assigned id, a status tag, and a
/// rating list; queries combine plus words (scored) and `-`-prefixed minus
/// words (hard exclusion). See the crate root for a usage example.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    analyzer: Analyzer,
    postings: PostingIndex,
    documents: DocumentStore,
    config: IndexConfig,
}

impl SearchIndex {
    /// Create an index with the given stop words and default configuration.
    ///
    /// Fails with `InvalidArgument` if any stop word contains a control
    /// character; empty stop words are ignored.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, IndexConfig::default())
    }

    /// Create an index from a space-separated stop-word string.
    pub fn from_stop_text(text: &str) -> Result<Self> {
        Ok(SearchIndex {
            analyzer: Analyzer::from_text(text)?,
            ..SearchIndex::default()
        })
    }

    /// Create an index with explicit configuration.
    pub fn with_config<I, S>(stop_words: I, config: IndexConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(SearchIndex {
            analyzer: Analyzer::new(stop_words)?,
            config,
            ..SearchIndex::default()
        })
    }

    /// Add a document to the index.
    ///
    /// # Arguments
    ///
    /// * `id` - Caller-assigned id; must be non-negative and not yet live.
    /// * `text` - Raw document text, tokenized on spaces.
    /// * `status` - Lifecycle tag stored verbatim.
    /// * `ratings` - Rating samples, averaged with truncation toward zero.
    ///
    /// Fails with `InvalidArgument` on a negative or duplicate id and with
    /// `InvalidDocument` when the text contains a control character. A
    /// failed add leaves the index untouched. A document whose text is all
    /// stop words is added with metadata but no postings.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(CalamusError::invalid_argument(format!(
                "document id {id} is negative"
            )));
        }
        if self.documents.contains(id) {
            return Err(CalamusError::invalid_argument(format!(
                "document id {id} already exists"
            )));
        }

        // Tokenize and validate the whole text before touching either
        // index, keeping a failed add invisible.
        let words = self.analyzer.document_words(text)?;
        let word_count = words.len();
        if word_count > 0 {
            let weight = 1.0 / word_count as f64;
            for word in words {
                self.postings.add(id, word, weight);
            }
        }

        self.documents.insert(
            id,
            DocumentData {
                rating: average_rating(ratings),
                status,
            },
        );
        debug!("added document {id}: {word_count} indexed words");
        Ok(())
    }

    /// Remove a document and every posting that references it.
    ///
    /// Removing an id that is not live is a no-op, not an error; this is
    /// deliberately asymmetric with [`match_document`], where an unknown
    /// id fails with `NotFound`.
    ///
    /// [`match_document`]: SearchIndex::match_document
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with(id, ExecutionMode::Sequential);
    }

    /// Remove a document, choosing how the posting erases are executed.
    pub fn remove_document_with(&mut self, id: DocId, mode: ExecutionMode) {
        if self.documents.remove(id).is_none() {
            return;
        }
        match mode {
            ExecutionMode::Sequential => self.postings.remove_document(id),
            ExecutionMode::Parallel => self.postings.remove_document_parallel(id),
        }
        debug!("removed document {id}");
    }

    /// Term frequencies of one document, keyed by word.
    ///
    /// Returns an empty map for an id that is not live; never fails.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<&str, f64> {
        self.postings.word_frequencies(id)
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// True when no documents are live.
    pub fn is_empty(&self) -> bool {
        self.documents.len() == 0
    }

    /// Whether the given id is live.
    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains(id)
    }

    /// Iterate live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents.ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_index() -> SearchIndex {
        SearchIndex::new(["in", "the"]).unwrap()
    }

    #[test]
    fn test_add_document_negative_id() {
        let mut index = create_test_index();
        let err = index
            .add_document(-1, "cat", DocumentStatus::Actual, &[1])
            .unwrap_err();
        assert!(matches!(err, CalamusError::InvalidArgument(_)));
        assert_eq!(index.document_count(), 0);
    }

    #[test]
    fn test_add_document_duplicate_id() {
        let mut index = create_test_index();
        index
            .add_document(5, "cat", DocumentStatus::Actual, &[1])
            .unwrap();
        let err = index
            .add_document(5, "dog", DocumentStatus::Actual, &[1])
            .unwrap_err();
        assert!(matches!(err, CalamusError::InvalidArgument(_)));
        assert_eq!(index.document_count(), 1);
    }

    #[test]
    fn test_failed_add_leaves_no_trace() {
        let mut index = create_test_index();
        let err = index
            .add_document(1, "good bad\u{1} text", DocumentStatus::Actual, &[1])
            .unwrap_err();
        assert!(matches!(err, CalamusError::InvalidDocument(_)));

        assert_eq!(index.document_count(), 0);
        assert!(!index.contains(1));
        assert!(index.word_frequencies(1).is_empty());
        // The id stays addable.
        index
            .add_document(1, "good text", DocumentStatus::Actual, &[1])
            .unwrap();
        assert_eq!(index.document_count(), 1);
    }

    #[test]
    fn test_word_frequencies_sum_to_one() {
        let mut index = create_test_index();
        index
            .add_document(
                3,
                "the quick brown fox jumps over the quick dog",
                DocumentStatus::Actual,
                &[4],
            )
            .unwrap();

        let freqs = index.word_frequencies(3);
        let total: f64 = freqs.values().sum();
        assert!((total - 1.0).abs() < 1e-6);
        // "quick" appears twice out of seven non-stop words.
        assert!((freqs["quick"] - 2.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_stop_word_document_is_valid() {
        let mut index = create_test_index();
        index
            .add_document(9, "the in the", DocumentStatus::Actual, &[])
            .unwrap();

        assert!(index.contains(9));
        assert_eq!(index.document_count(), 1);
        assert!(index.word_frequencies(9).is_empty());
    }

    #[test]
    fn test_remove_document_roundtrip() {
        let mut index = create_test_index();
        index
            .add_document(1, "cat dog", DocumentStatus::Actual, &[2])
            .unwrap();
        index
            .add_document(2, "dog fish", DocumentStatus::Actual, &[3])
            .unwrap();

        index.remove_document(1);

        assert!(!index.contains(1));
        assert!(index.word_frequencies(1).is_empty());
        assert_eq!(index.document_ids().collect::<Vec<_>>(), vec![2]);

        // The id is free for re-use after removal.
        index
            .add_document(1, "owl", DocumentStatus::Banned, &[])
            .unwrap();
        assert!(index.contains(1));
    }

    #[test]
    fn test_remove_document_is_idempotent() {
        let mut index = create_test_index();
        index
            .add_document(1, "cat", DocumentStatus::Actual, &[])
            .unwrap();

        index.remove_document(1);
        index.remove_document(1);
        index.remove_document(777);

        assert_eq!(index.document_count(), 0);
    }

    #[test]
    fn test_parallel_remove_matches_sequential() {
        let mut seq = create_test_index();
        let mut par = create_test_index();
        for index in [&mut seq, &mut par] {
            index
                .add_document(1, "shared words here", DocumentStatus::Actual, &[])
                .unwrap();
            index
                .add_document(2, "shared other words", DocumentStatus::Actual, &[])
                .unwrap();
        }

        seq.remove_document_with(1, ExecutionMode::Sequential);
        par.remove_document_with(1, ExecutionMode::Parallel);

        assert_eq!(par.document_count(), 1);
        assert_eq!(seq.word_frequencies(2), par.word_frequencies(2));
        assert!(par.word_frequencies(1).is_empty());
    }

    #[test]
    fn test_document_ids_ascending() {
        let mut index = create_test_index();
        for id in [11, 2, 7] {
            index
                .add_document(id, "words", DocumentStatus::Actual, &[])
                .unwrap();
        }
        let ids: Vec<DocId> = index.document_ids().collect();
        assert_eq!(ids, vec![2, 7, 11]);
    }

    #[test]
    fn test_stop_text_constructor() {
        let index = SearchIndex::from_stop_text("in the on").unwrap();
        assert!(index.is_empty());

        let err = SearchIndex::new(["bad\u{2}word"]).unwrap_err();
        assert!(matches!(err, CalamusError::InvalidArgument(_)));
    }
}
