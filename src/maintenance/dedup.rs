//! Duplicate document removal.
//!
//! Two documents are duplicates when they index the same set of words;
//! term frequencies, ratings, and statuses play no part. The sweep walks
//! ids in ascending order, so the lowest id of each duplicate group
//! survives regardless of insertion order.

use ahash::AHashSet;
use log::info;

use crate::document::DocId;
use crate::index::SearchIndex;

/// Remove every document whose word set already appeared under a lower id.
///
/// Returns the removed ids in ascending order.
///
/// # Example
///
/// ```
/// use calamus::{DocumentStatus, SearchIndex, remove_duplicates};
///
/// let mut index = SearchIndex::new(["the"]).unwrap();
/// index.add_document(1, "grey heron", DocumentStatus::Actual, &[]).unwrap();
/// index.add_document(2, "heron grey heron", DocumentStatus::Actual, &[]).unwrap();
///
/// assert_eq!(remove_duplicates(&mut index), vec![2]);
/// ```
pub fn remove_duplicates(index: &mut SearchIndex) -> Vec<DocId> {
    let doomed: Vec<DocId> = {
        let ids: Vec<DocId> = index.document_ids().collect();
        let mut seen: AHashSet<Vec<&str>> = AHashSet::with_capacity(ids.len());
        ids.into_iter()
            .filter(|&id| {
                // Keys of an ordered map form a canonical word set.
                let words: Vec<&str> = index.word_frequencies(id).into_keys().collect();
                !seen.insert(words)
            })
            .collect()
    };

    for &id in &doomed {
        info!("removing duplicate document {id}");
        index.remove_document(id);
    }
    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;

    fn add(index: &mut SearchIndex, id: DocId, text: &str) {
        index
            .add_document(id, text, DocumentStatus::Actual, &[1])
            .unwrap();
    }

    #[test]
    fn test_word_set_ignores_order_and_frequency() {
        let mut index = SearchIndex::new(["the", "and"]).unwrap();
        add(&mut index, 1, "the curly cat and curly tail");
        add(&mut index, 2, "tail curly cat");
        add(&mut index, 3, "curly cat");

        let removed = remove_duplicates(&mut index);

        assert_eq!(removed, vec![2]);
        assert!(index.contains(1));
        assert!(index.contains(3));
    }

    #[test]
    fn test_subset_is_not_a_duplicate() {
        let mut index = SearchIndex::new(Vec::<&str>::new()).unwrap();
        add(&mut index, 1, "cat dog");
        add(&mut index, 2, "cat");

        assert!(remove_duplicates(&mut index).is_empty());
        assert_eq!(index.document_count(), 2);
    }

    #[test]
    fn test_lowest_id_survives_regardless_of_insertion_order() {
        let mut index = SearchIndex::new(Vec::<&str>::new()).unwrap();
        add(&mut index, 9, "grey heron");
        add(&mut index, 4, "heron grey");
        add(&mut index, 6, "grey heron grey");

        let removed = remove_duplicates(&mut index);

        assert_eq!(removed, vec![6, 9]);
        assert_eq!(index.document_ids().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_all_stop_word_documents_collapse() {
        let mut index = SearchIndex::new(["in", "the"]).unwrap();
        add(&mut index, 1, "in the");
        add(&mut index, 2, "the in the in");
        add(&mut index, 3, "owl");

        let removed = remove_duplicates(&mut index);

        assert_eq!(removed, vec![2]);
        assert_eq!(index.document_count(), 2);
    }

    #[test]
    fn test_removed_duplicates_stop_scoring() {
        let mut index = SearchIndex::new(Vec::<&str>::new()).unwrap();
        add(&mut index, 1, "stork nest");
        add(&mut index, 2, "nest stork");

        remove_duplicates(&mut index);

        let hits = index.search("stork").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }
}
