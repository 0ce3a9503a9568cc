//! Text analysis: tokenization, token validation, and query parsing.

pub mod analyzer;
pub mod query;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use query::ParsedQuery;
