//! Interned word storage and the dual posting structure.
//!
//! Words are interned once into an append-only table; the forward index
//! (document → word → tf) and the inverted index (word → document → tf)
//! both key on copyable [`WordId`] handles into that table. The two maps
//! are exact mirrors: an (id, word) pair exists in one iff it exists in
//! the other, with the same term frequency.

use std::collections::BTreeMap;

use ahash::AHashMap;
use rayon::prelude::*;

use crate::document::DocId;

/// Handle into the interned word table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct WordId(u32);

/// Append-only interned word storage.
///
/// The table owns each distinct word exactly once and never shrinks, so a
/// handle stays valid for the index's whole lifetime even when every
/// document using the word has been removed.
#[derive(Debug, Clone, Default)]
pub(crate) struct WordTable {
    words: Vec<String>,
    lookup: AHashMap<String, WordId>,
}

impl WordTable {
    /// Intern a word, returning the existing handle when already present.
    pub fn intern(&mut self, word: &str) -> WordId {
        if let Some(&id) = self.lookup.get(word) {
            return id;
        }
        let id = WordId(self.words.len() as u32);
        self.words.push(word.to_string());
        self.lookup.insert(word.to_string(), id);
        id
    }

    /// Look up the handle of a word that may not be interned.
    pub fn get(&self, word: &str) -> Option<WordId> {
        self.lookup.get(word).copied()
    }

    /// Resolve a handle back to its text.
    pub fn text(&self, id: WordId) -> &str {
        &self.words[id.0 as usize]
    }
}

/// The dual forward/inverted posting structure.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostingIndex {
    words: WordTable,

    /// word → document → term frequency.
    inverted: AHashMap<WordId, BTreeMap<DocId, f64>>,

    /// document → word → term frequency.
    forward: AHashMap<DocId, BTreeMap<WordId, f64>>,
}

impl PostingIndex {
    /// Add `weight` to both mirrors for (id, word), interning the word.
    ///
    /// Called once per token occurrence; repeated occurrences of a word in
    /// one document accumulate into a single posting entry.
    pub fn add(&mut self, id: DocId, word: &str, weight: f64) {
        let word_id = self.words.intern(word);
        *self
            .inverted
            .entry(word_id)
            .or_default()
            .entry(id)
            .or_insert(0.0) += weight;
        *self
            .forward
            .entry(id)
            .or_default()
            .entry(word_id)
            .or_insert(0.0) += weight;
    }

    /// Postings of a word, or `None` when the word is unknown or no longer
    /// has any documents.
    ///
    /// Removal leaves empty posting maps behind (lazy cleanup); hiding
    /// them here keeps that invisible to every query path.
    pub fn postings(&self, word: &str) -> Option<&BTreeMap<DocId, f64>> {
        let word_id = self.words.get(word)?;
        self.inverted.get(&word_id).filter(|p| !p.is_empty())
    }

    /// Whether the word's postings include the given document.
    pub fn contains(&self, word: &str, id: DocId) -> bool {
        self.postings(word).is_some_and(|p| p.contains_key(&id))
    }

    /// Word → tf view of one document, resolved to text.
    ///
    /// Empty when the document is absent; never fails.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<&str, f64> {
        match self.forward.get(&id) {
            Some(words) => words
                .iter()
                .map(|(&word_id, &tf)| (self.words.text(word_id), tf))
                .collect(),
            None => BTreeMap::new(),
        }
    }

    /// Remove every posting of a document from both mirrors.
    pub fn remove_document(&mut self, id: DocId) {
        let Some(words) = self.forward.remove(&id) else {
            return;
        };
        for word_id in words.keys() {
            if let Some(postings) = self.inverted.get_mut(word_id) {
                postings.remove(&id);
            }
        }
    }

    /// Parallel variant of [`remove_document`](Self::remove_document):
    /// erases the document's entries across its words on the rayon pool.
    pub fn remove_document_parallel(&mut self, id: DocId) {
        let Some(words) = self.forward.remove(&id) else {
            return;
        };
        // Erases for different words touch disjoint posting maps; collect
        // the mutable references first, then fan out.
        let mut touched: Vec<_> = self
            .inverted
            .iter_mut()
            .filter_map(|(word_id, postings)| words.contains_key(word_id).then_some(postings))
            .collect();
        touched.par_iter_mut().for_each(|postings| {
            postings.remove(&id);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_index() -> PostingIndex {
        let mut index = PostingIndex::default();
        // doc 1: "cat dog cat", doc 2: "dog fish"
        index.add(1, "cat", 1.0 / 3.0);
        index.add(1, "dog", 1.0 / 3.0);
        index.add(1, "cat", 1.0 / 3.0);
        index.add(2, "dog", 0.5);
        index.add(2, "fish", 0.5);
        index
    }

    fn assert_mirrored(index: &PostingIndex) {
        for (word_id, postings) in &index.inverted {
            for (doc_id, tf) in postings {
                assert_eq!(index.forward[doc_id].get(word_id), Some(tf));
            }
        }
        for (doc_id, words) in &index.forward {
            for (word_id, tf) in words {
                assert_eq!(index.inverted[word_id].get(doc_id), Some(tf));
            }
        }
    }

    #[test]
    fn test_intern_is_stable() {
        let mut table = WordTable::default();
        let first = table.intern("cat");
        let second = table.intern("cat");
        assert_eq!(first, second);
        assert_eq!(table.text(first), "cat");
        assert_eq!(table.get("cat"), Some(first));
        assert_eq!(table.get("dog"), None);
    }

    #[test]
    fn test_add_keeps_mirror_invariant() {
        let index = create_test_index();
        assert_mirrored(&index);
    }

    #[test]
    fn test_occurrences_accumulate() {
        let index = create_test_index();
        let postings = index.postings("cat").unwrap();
        assert!((postings[&1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_postings_unknown_word() {
        let index = create_test_index();
        assert!(index.postings("whale").is_none());
        assert!(!index.contains("whale", 1));
    }

    #[test]
    fn test_word_frequencies_resolved_and_sorted() {
        let index = create_test_index();
        let freqs = index.word_frequencies(1);
        let words: Vec<&str> = freqs.keys().copied().collect();
        assert_eq!(words, vec!["cat", "dog"]);

        assert!(index.word_frequencies(99).is_empty());
    }

    #[test]
    fn test_remove_document_scrubs_both_mirrors() {
        let mut index = create_test_index();
        index.remove_document(1);

        assert!(index.word_frequencies(1).is_empty());
        assert!(!index.contains("cat", 1));
        assert!(!index.contains("dog", 1));
        // doc 2 untouched
        assert!(index.contains("dog", 2));
        assert_mirrored(&index);
    }

    #[test]
    fn test_empty_posting_map_is_hidden() {
        let mut index = create_test_index();
        index.remove_document(1);
        index.remove_document(2);

        // The inverted entries still exist but must not be observable.
        assert!(index.postings("cat").is_none());
        assert!(index.postings("dog").is_none());
        assert!(index.postings("fish").is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut index = create_test_index();
        index.remove_document(1);
        index.remove_document(1);
        assert_mirrored(&index);
    }

    #[test]
    fn test_parallel_remove_matches_sequential() {
        let mut sequential = create_test_index();
        let mut parallel = create_test_index();

        sequential.remove_document(1);
        parallel.remove_document_parallel(1);

        assert_mirrored(&parallel);
        assert_eq!(
            sequential.word_frequencies(2),
            parallel.word_frequencies(2)
        );
        assert!(parallel.word_frequencies(1).is_empty());
        assert_eq!(
            sequential.postings("dog").is_some(),
            parallel.postings("dog").is_some()
        );
    }

    #[test]
    fn test_readd_after_remove() {
        let mut index = create_test_index();
        index.remove_document(1);
        index.add(1, "owl", 1.0);

        assert!(index.contains("owl", 1));
        assert!(!index.contains("cat", 1));
        assert_mirrored(&index);
    }
}
