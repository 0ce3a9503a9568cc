//! Sharded concurrent accumulation for the parallel scoring path.
//!
//! Scoring fans out one worker per query term, and every worker adds
//! partial scores for whatever documents its term touches. A single map
//! behind one lock would serialize them all; [`ShardedAccumulator`]
//! partitions the key space over a fixed number of independently locked
//! shards so that workers only contend when they touch keys in the same
//! shard.

use std::collections::BTreeMap;
use std::hash::Hash;
use std::ops::AddAssign;

use ahash::{AHashMap, RandomState};
use parking_lot::Mutex;

/// A fixed-shard key→value accumulator safe for concurrent writers.
///
/// The type exposes exactly two operations: [`accumulate`] adds a delta
/// under the owning shard's lock, and [`drain`] consumes the accumulator
/// into one ordered map. Draining by value means the compiler rules out
/// concurrent writers during the merge; there is no way to observe a
/// half-merged state.
///
/// [`accumulate`]: ShardedAccumulator::accumulate
/// [`drain`]: ShardedAccumulator::drain
#[derive(Debug)]
pub struct ShardedAccumulator<K, V> {
    shards: Vec<Mutex<AHashMap<K, V>>>,
    hasher: RandomState,
}

impl<K, V> ShardedAccumulator<K, V>
where
    K: Eq + Hash + Ord,
    V: Default + AddAssign,
{
    /// Create an accumulator with the given number of shards.
    ///
    /// A count of 0 is treated as 1. More shards than concurrent workers
    /// is harmless; fewer increases contention but never loses updates.
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(AHashMap::new()))
            .collect();
        ShardedAccumulator {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Add `delta` to the accumulator entry for `key`, creating the entry
    /// at `V::default()` first if it is new.
    ///
    /// Only the shard owning `key` is locked, so accumulates on keys in
    /// different shards proceed in parallel; accumulates on the same key
    /// serialize and sum exactly.
    pub fn accumulate(&self, key: K, delta: V) {
        let shard = &self.shards[self.shard_for(&key)];
        let mut entries = shard.lock();
        *entries.entry(key).or_default() += delta;
    }

    /// Merge all shards into a single ordered mapping.
    ///
    /// Consumes the accumulator; callers must have joined every worker
    /// before they can call this, which is the required barrier.
    pub fn drain(self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            // A key lives in exactly one shard, so plain inserts suffice.
            merged.extend(shard.into_inner());
        }
        merged
    }

    fn shard_for(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }
}
