//! Parallel fan-out of independent queries over one index.

use rayon::prelude::*;

use crate::error::Result;
use crate::index::{SearchHit, SearchIndex};

/// Run many queries against the index on the rayon pool.
///
/// The output keeps the query order: `result[i]` holds the hits for
/// `queries[i]`. When several queries are invalid, the error of the
/// earliest one is returned.
pub fn search_batch<S>(index: &SearchIndex, queries: &[S]) -> Result<Vec<Vec<SearchHit>>>
where
    S: AsRef<str> + Sync,
{
    let results: Vec<Result<Vec<SearchHit>>> = queries
        .par_iter()
        .map(|query| index.search(query.as_ref()))
        .collect();
    results.into_iter().collect()
}

/// Run many queries and flatten their hits into one list, in query order.
///
/// Hits of the first query come first, then the second, and so on; within
/// one query the ranked order is preserved.
pub fn search_batch_joined<S>(index: &SearchIndex, queries: &[S]) -> Result<Vec<SearchHit>>
where
    S: AsRef<str> + Sync,
{
    Ok(search_batch(index, queries)?.into_iter().flatten().collect())
}
