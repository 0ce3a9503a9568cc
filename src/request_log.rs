//! A sliding window of recent search outcomes.
//!
//! [`RequestLog`] wraps a [`SearchIndex`] reference, forwards searches to
//! it, and remembers for each completed request whether it produced any
//! hits. Only the newest `capacity` requests are retained, so
//! [`no_result_count`] answers "how many of the recent requests found
//! nothing" in constant time.
//!
//! The log borrows the index immutably for its whole lifetime, which keeps
//! the recorded outcomes consistent with the index state they were
//! produced against.
//!
//! [`no_result_count`]: RequestLog::no_result_count

use std::collections::VecDeque;

use crate::document::{DocId, DocumentStatus};
use crate::error::Result;
use crate::index::{SearchHit, SearchIndex};

/// Default window size, one slot per minute of a day.
pub const DEFAULT_WINDOW: usize = 1440;

/// Records the outcomes of the most recent searches against one index.
#[derive(Debug)]
pub struct RequestLog<'a> {
    index: &'a SearchIndex,
    // One entry per completed request, true when it produced no hits.
    window: VecDeque<bool>,
    capacity: usize,
    no_result_count: usize,
}

impl<'a> RequestLog<'a> {
    /// Create a log with the default window of [`DEFAULT_WINDOW`] requests.
    pub fn new(index: &'a SearchIndex) -> Self {
        Self::with_capacity(index, DEFAULT_WINDOW)
    }

    /// Create a log retaining the newest `capacity` requests.
    ///
    /// A capacity of zero is treated as one so the log always retains at
    /// least the latest request.
    pub fn with_capacity(index: &'a SearchIndex, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RequestLog {
            index,
            window: VecDeque::with_capacity(capacity),
            capacity,
            no_result_count: 0,
        }
    }

    /// Search actual documents, recording whether anything matched.
    pub fn search(&mut self, query: &str) -> Result<Vec<SearchHit>> {
        let hits = self.index.search(query)?;
        self.record(hits.is_empty());
        Ok(hits)
    }

    /// Search by status, recording whether anything matched.
    pub fn search_by_status(
        &mut self,
        query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<SearchHit>> {
        let hits = self.index.search_by_status(query, status)?;
        self.record(hits.is_empty());
        Ok(hits)
    }

    /// Search with a predicate, recording whether anything matched.
    pub fn search_filtered<P>(&mut self, query: &str, predicate: P) -> Result<Vec<SearchHit>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let hits = self.index.search_filtered(query, predicate)?;
        self.record(hits.is_empty());
        Ok(hits)
    }

    /// Number of retained requests that produced no hits.
    pub fn no_result_count(&self) -> usize {
        self.no_result_count
    }

    /// Number of requests currently retained, at most the capacity.
    pub fn request_count(&self) -> usize {
        self.window.len()
    }

    /// Maximum number of requests the window retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Failed requests never reach this point, so the window only ever
    // holds completed searches.
    fn record(&mut self, no_results: bool) {
        self.window.push_back(no_results);
        if no_results {
            self.no_result_count += 1;
        }
        if self.window.len() > self.capacity && self.window.pop_front() == Some(true) {
            self.no_result_count -= 1;
        }
    }
}
