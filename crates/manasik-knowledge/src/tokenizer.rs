//! Lowercasing word tokenizer.
//!
//! Every character outside ASCII `[a-z0-9]` (after lowercasing) acts as a
//! separator, so punctuation never glues two words together: `"Sa'i"` becomes
//! `["sa", "i"]`.

use std::collections::HashSet;

/// Split text into lowercase ASCII alphanumeric tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Unique tokens of `text`.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
