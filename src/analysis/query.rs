//! Parsed query representation and query token classification.

use crate::error::{CalamusError, Result};

use super::tokenizer;

/// A query reduced to its scoring terms.
///
/// Both word lists are sorted and deduplicated, so downstream consumers see
/// each term once and in a deterministic order regardless of how the query
/// text repeated or ordered them. Stop words never appear in either list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Terms that contribute to a document's score.
    pub plus_words: Vec<String>,

    /// Terms whose presence excludes a document entirely.
    pub minus_words: Vec<String>,
}

impl ParsedQuery {
    /// True when the query has no effective terms at all.
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

/// Strip an optional leading `-` from a query token and validate the rest.
///
/// Returns `(is_minus, word)`. Fails when the token is empty after
/// stripping, carries a second leading `-`, or contains a control
/// character.
pub(crate) fn strip_minus(token: &str) -> Result<(bool, &str)> {
    let (is_minus, word) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    if word.is_empty() {
        return Err(CalamusError::invalid_query(format!(
            "query word {token:?} is empty after stripping '-'"
        )));
    }
    if is_minus && word.starts_with('-') {
        return Err(CalamusError::invalid_query(format!(
            "query word {token:?} has a double negation"
        )));
    }
    if !tokenizer::is_valid_word(word) {
        return Err(CalamusError::invalid_query(format!(
            "query word {token:?} contains a control character"
        )));
    }

    Ok((is_minus, word))
}
