//! The analyzer: configured stop words plus the document and query
//! tokenization paths built on them.

use ahash::AHashSet;

use crate::error::{CalamusError, Result};

use super::query::{self, ParsedQuery};
use super::tokenizer;

/// Tokenizes document and query text against a configured stop-word set.
///
/// An analyzer is built once per index. Stop words are validated at
/// construction: empty entries are dropped and entries containing control
/// characters are rejected with `InvalidArgument`.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    stop_words: AHashSet<String>,
}

impl Analyzer {
    /// Create an analyzer from any collection of stop words.
    ///
    /// # Example
    ///
    /// ```
    /// use calamus::analysis::Analyzer;
    ///
    /// let analyzer = Analyzer::new(["the", "a", "an"]).unwrap();
    /// assert!(analyzer.is_stop_word("the"));
    /// assert!(!analyzer.is_stop_word("fox"));
    /// ```
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = AHashSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !tokenizer::is_valid_word(word) {
                return Err(CalamusError::invalid_argument(format!(
                    "stop word {word:?} contains a control character"
                )));
            }
            set.insert(word.to_string());
        }
        Ok(Analyzer { stop_words: set })
    }

    /// Create an analyzer from a single space-separated string of stop words.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(tokenizer::split_words(text))
    }

    /// Whether the given word is a configured stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Tokenize document text, dropping stop words.
    ///
    /// Duplicates are preserved (term frequency counts every occurrence).
    /// Fails with `InvalidDocument` if any token contains a control
    /// character; on failure nothing about the text is usable, which keeps
    /// document insertion all-or-nothing.
    pub fn document_words<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for token in tokenizer::split_words(text) {
            if !tokenizer::is_valid_word(token) {
                return Err(CalamusError::invalid_document(format!(
                    "token {token:?} contains a control character"
                )));
            }
            if !self.is_stop_word(token) {
                words.push(token);
            }
        }
        Ok(words)
    }

    /// Parse query text into deduplicated plus and minus word lists.
    ///
    /// Stop words are dropped from both lists. Fails with `InvalidQuery`
    /// on any malformed token (see [`ParsedQuery`] for the canonical
    /// ordering guarantees).
    pub fn parse_query(&self, text: &str) -> Result<ParsedQuery> {
        let mut plus_words = Vec::new();
        let mut minus_words = Vec::new();

        for token in tokenizer::split_words(text) {
            let (is_minus, word) = query::strip_minus(token)?;
            if self.is_stop_word(word) {
                continue;
            }
            if is_minus {
                minus_words.push(word.to_string());
            } else {
                plus_words.push(word.to_string());
            }
        }

        plus_words.sort_unstable();
        plus_words.dedup();
        minus_words.sort_unstable();
        minus_words.dedup();

        Ok(ParsedQuery {
            plus_words,
            minus_words,
        })
    }
}
