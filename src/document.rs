//! Document metadata: status tags, ratings, and the live-id registry.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Identifier for a document within one index.
///
/// Ids are caller-assigned and must be non-negative; an id stays unique
/// while live and may be reused after explicit removal. The type is signed
/// so that a negative id is a reportable error rather than an
/// unrepresentable one.
pub type DocId = i64;

/// Caller-assigned lifecycle tag carried alongside each document.
///
/// The index stores and filters on the status but never changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Live content, the default search target.
    #[default]
    Actual,
    /// Kept but no longer relevant.
    Irrelevant,
    /// Blocked from default search by editorial decision.
    Banned,
    /// Slated for deletion.
    Removed,
}

/// Metadata stored per live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Average of caller-supplied ratings, truncated toward zero.
///
/// Returns 0 for an empty list. Truncation (not flooring) is observable
/// for mixed-sign inputs: `[-1, 2, -4]` averages to -1, not -2.
pub(crate) fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

/// Per-document metadata plus the ordered set of live ids.
///
/// The id set iterates ascending, giving external sweeps a stable,
/// insertion-order-independent traversal.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocumentStore {
    entries: AHashMap<DocId, DocumentData>,
    ids: BTreeSet<DocId>,
}

impl DocumentStore {
    pub fn insert(&mut self, id: DocId, data: DocumentData) {
        self.entries.insert(id, data);
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: DocId) -> Option<DocumentData> {
        self.ids.remove(&id);
        self.entries.remove(&id)
    }

    pub fn get(&self, id: DocId) -> Option<DocumentData> {
        self.entries.get(&id).copied()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.ids.iter().copied()
    }
}
