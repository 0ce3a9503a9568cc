//! Offline maintenance passes over a search index.

pub mod dedup;

pub use dedup::remove_duplicates;
