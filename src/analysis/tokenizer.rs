//! Space-delimited tokenization and token validation.

/// Split text on the ASCII space character, yielding non-empty tokens.
///
/// The returned iterator is lazy and can be re-created from the same text
/// any number of times. Splitting happens on `' '` specifically rather than
/// on all whitespace: a tab or newline embedded in a token is a validation
/// failure (see [`is_valid_word`]), not a token separator.
///
/// # Example
///
/// ```
/// use calamus::analysis::tokenizer::split_words;
///
/// let words: Vec<&str> = split_words("  quick  brown fox ").collect();
/// assert_eq!(words, vec!["quick", "brown", "fox"]);
/// ```
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|word| !word.is_empty())
}

/// Check that a token carries no control characters.
///
/// A token is invalid when any of its characters has a code point in
/// `[0x00, 0x20)`. Everything else, including non-ASCII text, is valid.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}
