//! Stopwords excluded from duplicate detection.
//!
//! The built-in list holds common English function words and the seven
//! single punctuation marks the tokenizer recognizes. Callers can extend it
//! (e.g. from configuration) through [`Stopwords::with_extra`].

use std::collections::HashSet;
use std::sync::LazyLock;

/// Common function words and single punctuation marks (the, a, `.`, `-`, etc.).
///
/// Entries are lowercase. Punctuation runs such as `---` are *not* listed:
/// only the individual marks are.
pub static FUNCTION_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "is", "to", "and", "or", "but", "of", "in", "on", "for", "at", "by",
        "with", "from", "as", "that", "this", "it", "be", "are", "was", "were", "am", "not", "no",
        "do", "does", "did", "so", "if", "then", "than", "too", "very", "can", "will", "just",
        "you", "i", "he", "she", "they", "them", "his", "her", "their", "we", "us", "our", "ours",
        ".", ",", "!", "?", ":", ";", "-",
    ]
    .into_iter()
    .collect()
});

/// A case-insensitive stopword set: the built-in [`FUNCTION_WORDS`] plus any
/// caller-supplied additions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    extra: HashSet<String>,
}

impl Stopwords {
    /// The built-in set with additional words.
    ///
    /// Entries are trimmed and lowercased; blank entries are ignored.
    pub fn with_extra<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && !FUNCTION_WORDS.contains(w.as_str()))
            .collect();
        Self { extra }
    }

    /// Whether `word` is a stopword, ignoring case.
    pub fn contains(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        FUNCTION_WORDS.contains(lower.as_str()) || self.extra.contains(&lower)
    }

    /// Number of distinct entries, built-ins included.
    pub fn len(&self) -> usize {
        FUNCTION_WORDS.len() + self.extra.len()
    }

    /// Always `false`: the built-in list is never empty.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The configured additions, sorted.
    pub fn extra(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.extra.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}
