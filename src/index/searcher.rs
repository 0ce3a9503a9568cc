//! Query execution: TF-IDF scoring, ranking, and per-document matching.
//!
//! Scores accumulate per plus word as `tf * idf`, where `idf` is computed
//! against the live document count at query time. Minus words exclude
//! documents after accumulation. Ranking sorts by descending score, breaks
//! near-ties (within [`SCORE_EPSILON`]) by descending rating, and truncates
//! to the configured result cap.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::ParsedQuery;
use crate::concurrent::ShardedAccumulator;
use crate::document::{DocId, DocumentStatus};
use crate::error::{CalamusError, Result};

use super::{ExecutionMode, SearchIndex};

/// Scores closer than this are considered tied and rank by rating.
pub const SCORE_EPSILON: f64 = 1e-6;

/// One ranked search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Id of the matched document.
    pub id: DocId,
    /// Accumulated TF-IDF relevance.
    pub score: f64,
    /// Stored rating of the document.
    pub rating: i32,
}

impl SearchIndex {
    /// Search documents with status [`DocumentStatus::Actual`].
    ///
    /// The query combines plus words (scored) and `-`-prefixed minus words
    /// (hard exclusion). A query with no plus words returns no hits.
    ///
    /// # Example
    ///
    /// ```
    /// use calamus::{DocumentStatus, SearchIndex};
    ///
    /// let mut index = SearchIndex::new(["the"]).unwrap();
    /// index.add_document(1, "the quick brown fox", DocumentStatus::Actual, &[4]).unwrap();
    ///
    /// let hits = index.search("quick -hedgehog").unwrap();
    /// assert_eq!(hits[0].id, 1);
    /// ```
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.search_with(query, ExecutionMode::Sequential)
    }

    /// Search actual documents, choosing the execution strategy.
    pub fn search_with(&self, query: &str, mode: ExecutionMode) -> Result<Vec<SearchHit>> {
        self.search_filtered_with(query, mode, |_, status, _| status == DocumentStatus::Actual)
    }

    /// Search documents carrying exactly the given status.
    pub fn search_by_status(&self, query: &str, status: DocumentStatus) -> Result<Vec<SearchHit>> {
        self.search_filtered(query, move |_, document_status, _| document_status == status)
    }

    /// Search documents accepted by an arbitrary predicate.
    ///
    /// The predicate sees `(id, status, rating)` and must be pure; it may
    /// be invoked several times for the same document.
    pub fn search_filtered<P>(&self, query: &str, predicate: P) -> Result<Vec<SearchHit>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.search_filtered_with(query, ExecutionMode::Sequential, predicate)
    }

    /// Search with an arbitrary predicate and execution strategy.
    pub fn search_filtered_with<P>(
        &self,
        query: &str,
        mode: ExecutionMode,
        predicate: P,
    ) -> Result<Vec<SearchHit>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let parsed = self.analyzer.parse_query(query)?;
        let mut scores = match mode {
            ExecutionMode::Sequential => self.score_sequential(&parsed, &predicate),
            ExecutionMode::Parallel => self.score_parallel(&parsed, &predicate),
        };
        self.exclude_minus(&mut scores, &parsed.minus_words);
        debug!(
            "query scored {} candidates over {} plus words",
            scores.len(),
            parsed.plus_words.len()
        );
        Ok(self.rank(scores))
    }

    /// Report which query words occur in one document.
    ///
    /// Returns the matched plus words in ascending order together with the
    /// document's status. A document containing any minus word yields an
    /// empty word list. Fails with `NotFound` for an id that is not live;
    /// that check precedes query validation.
    pub fn match_document(&self, query: &str, id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with(query, id, ExecutionMode::Sequential)
    }

    /// Match a document, choosing the execution strategy.
    pub fn match_document_with(
        &self,
        query: &str,
        id: DocId,
        mode: ExecutionMode,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let Some(data) = self.documents.get(id) else {
            return Err(CalamusError::not_found(format!(
                "document {id} is not in the index"
            )));
        };
        let parsed = self.analyzer.parse_query(query)?;

        let matched = match mode {
            ExecutionMode::Sequential => {
                if parsed
                    .minus_words
                    .iter()
                    .any(|word| self.postings.contains(word, id))
                {
                    return Ok((Vec::new(), data.status));
                }
                parsed
                    .plus_words
                    .iter()
                    .filter(|word| self.postings.contains(word, id))
                    .cloned()
                    .collect()
            }
            ExecutionMode::Parallel => {
                if parsed
                    .minus_words
                    .par_iter()
                    .any(|word| self.postings.contains(word, id))
                {
                    return Ok((Vec::new(), data.status));
                }
                // Parallel collect keeps the source order, so the output
                // stays sorted like the parsed plus words.
                parsed
                    .plus_words
                    .par_iter()
                    .filter(|word| self.postings.contains(word, id))
                    .cloned()
                    .collect()
            }
        };
        Ok((matched, data.status))
    }

    fn score_sequential<P>(&self, query: &ParsedQuery, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut scores = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.postings.postings(word) else {
                continue;
            };
            let idf = self.inverse_document_frequency(postings.len());
            for (&id, &tf) in postings {
                if self.passes(predicate, id) {
                    *scores.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }
        scores
    }

    fn score_parallel<P>(&self, query: &ParsedQuery, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let accumulator = ShardedAccumulator::new(self.config.accumulator_shards);
        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.postings.postings(word) else {
                return;
            };
            let idf = self.inverse_document_frequency(postings.len());
            for (&id, &tf) in postings {
                if self.passes(predicate, id) {
                    accumulator.accumulate(id, tf * idf);
                }
            }
        });
        accumulator.drain()
    }

    fn exclude_minus(&self, scores: &mut BTreeMap<DocId, f64>, minus_words: &[String]) {
        for word in minus_words {
            let Some(postings) = self.postings.postings(word) else {
                continue;
            };
            for id in postings.keys() {
                scores.remove(id);
            }
        }
    }

    fn passes<P>(&self, predicate: &P, id: DocId) -> bool
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        self.documents
            .get(id)
            .is_some_and(|data| predicate(id, data.status, data.rating))
    }

    /// Natural log of live documents over documents containing the word.
    fn inverse_document_frequency(&self, containing: usize) -> f64 {
        (self.documents.len() as f64 / containing as f64).ln()
    }

    fn rank(&self, scores: BTreeMap<DocId, f64>) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter_map(|(id, score)| {
                self.documents.get(id).map(|data| SearchHit {
                    id,
                    score,
                    rating: data.rating,
                })
            })
            .collect();
        // Stable sort over id-ordered input: full ties keep ascending id,
        // so sequential and parallel runs rank identically.
        hits.sort_by(|a, b| {
            if (a.score - b.score).abs() < SCORE_EPSILON {
                b.rating.cmp(&a.rating)
            } else {
                b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
            }
        });
        hits.truncate(self.config.max_results);
        hits
    }
}
