//! # Calamus
//!
//! An in-memory TF-IDF document search library for Rust.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - TF-IDF ranked keyword search with minus-word exclusion
//! - Stop-word aware analysis and strict input validation
//! - Status tags and predicate filtering over documents
//! - Sequential or rayon-parallel execution, selected per call
//! - Duplicate removal, request-outcome tracking, and query batching
//!
//! ## Example
//!
//! ```
//! use calamus::{DocumentStatus, SearchIndex};
//!
//! let mut index = SearchIndex::new(["a", "the", "with"])?;
//! index.add_document(0, "a white cat with a shiny collar", DocumentStatus::Actual, &[8, -3])?;
//! index.add_document(1, "a fluffy cat with a fluffy tail", DocumentStatus::Actual, &[7, 2, 7])?;
//!
//! let hits = index.search("fluffy cat -collar")?;
//! assert_eq!(hits[0].id, 1);
//! # Ok::<(), calamus::CalamusError>(())
//! ```

// Core modules
pub mod analysis;
mod batch;
pub mod concurrent;
mod document;
mod error;
mod index;
mod maintenance;
pub mod request_log;

// Re-exports for the public API
pub use analysis::{Analyzer, ParsedQuery};
pub use batch::{search_batch, search_batch_joined};
pub use concurrent::ShardedAccumulator;
pub use document::{DocId, DocumentStatus};
pub use error::{CalamusError, Result};
pub use index::{
    DEFAULT_MAX_RESULTS, ExecutionMode, IndexConfig, SCORE_EPSILON, SearchHit, SearchIndex,
};
pub use maintenance::remove_duplicates;
pub use request_log::RequestLog;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
