//! Duplicate token detection.
//!
//! Every distinct non-stopword token is searched for as a raw substring of
//! the whole text, case-insensitively and with overlaps. Forms found two or
//! more times are duplicates, and each of their occurrences becomes a
//! [`HighlightRange`].
//!
//! Substring search is deliberate: `cat` inside `category` counts as an
//! occurrence of `cat`.

use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

use aho_corasick::AhoCorasick;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::text;
use crate::word_lists::Stopwords;

/// A half-open `[start, end)` interval of character offsets to highlight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct HighlightRange {
    /// First highlighted character.
    pub start: usize,
    /// One past the last highlighted character.
    pub end: usize,
}

impl HighlightRange {
    /// Create a range. `end` is clamped so it never precedes `start`.
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Number of characters covered.
    ///
    /// A deserialized range can have `end < start`; it covers nothing.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no characters.
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The range as a standard [`Range`].
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for HighlightRange {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

/// A candidate form that occurs at least twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DuplicateWord {
    /// Lowercase form.
    pub word: String,
    /// Character offsets of every occurrence, ascending.
    pub positions: Vec<usize>,
}

impl DuplicateWord {
    /// Number of occurrences.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Highlight ranges for every occurrence.
    pub fn ranges(&self) -> impl Iterator<Item = HighlightRange> + '_ {
        let len = self.word.chars().count();
        self.positions
            .iter()
            .map(move |&p| HighlightRange::new(p, p + len))
    }
}

/// Compute highlight ranges using the built-in stopwords.
///
/// Pure function of `text`: calling it twice yields the same set.
pub fn compute_highlights(text: &str) -> BTreeSet<HighlightRange> {
    compute_highlights_with(text, &Stopwords::default())
}

/// Compute highlight ranges with a caller-supplied stopword set.
///
/// Overlapping ranges from different forms are kept as they are; merging
/// them is up to whoever renders the highlights.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn compute_highlights_with(text: &str, stopwords: &Stopwords) -> BTreeSet<HighlightRange> {
    let ranges: BTreeSet<HighlightRange> = find_duplicates(text, stopwords)
        .iter()
        .flat_map(DuplicateWord::ranges)
        .collect();
    tracing::debug!(ranges = ranges.len(), "computed highlights");
    ranges
}

/// Find every candidate form that occurs at least twice.
///
/// Sorted by occurrence count (descending), then alphabetically.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn find_duplicates(text: &str, stopwords: &Stopwords) -> Vec<DuplicateWord> {
    let candidates = candidate_forms(text, stopwords);
    if candidates.is_empty() {
        return Vec::new();
    }

    let positions = match AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(&candidates)
    {
        Ok(matcher) => {
            let offsets = CharOffsets::new(text);
            let mut positions = vec![Vec::new(); candidates.len()];
            // Matches arrive ordered by end offset; for a single pattern that is
            // also start order, so each list stays sorted.
            for m in matcher.find_overlapping_iter(text) {
                positions[m.pattern().as_usize()].push(offsets.char_offset(m.start()));
            }
            positions
        }
        Err(e) => {
            tracing::warn!(error = %e, "combined matcher unavailable, searching forms one by one");
            candidates.iter().map(|w| occurrences(text, w)).collect()
        }
    };

    let mut duplicates: Vec<DuplicateWord> = candidates
        .into_iter()
        .zip(positions)
        .filter(|(_, positions)| positions.len() >= 2)
        .map(|(word, positions)| DuplicateWord { word, positions })
        .collect();

    duplicates.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.word.cmp(&b.word)));
    tracing::debug!(duplicates = duplicates.len(), "found duplicates");
    duplicates
}

/// Character offsets of every case-insensitive, possibly overlapping
/// occurrence of `form` in `text`.
///
/// `form` is matched with ASCII case folding; tokens only ever contain ASCII.
pub fn occurrences(text: &str, form: &str) -> Vec<usize> {
    if form.is_empty() {
        return Vec::new();
    }
    let offsets = CharOffsets::new(text);
    match AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build([form])
    {
        Ok(matcher) => matcher
            .find_overlapping_iter(text)
            .map(|m| offsets.char_offset(m.start()))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "matcher unavailable, scanning directly");
            scan_overlapping(text, form)
                .into_iter()
                .map(|b| offsets.char_offset(b))
                .collect()
        }
    }
}

/// Distinct lowercase token forms that are not stopwords, in sorted order.
fn candidate_forms(text: &str, stopwords: &Stopwords) -> Vec<String> {
    let forms: HashSet<String> = text::tokenize(text)
        .into_iter()
        .map(|t| t.normal)
        .filter(|w| !stopwords.contains(w))
        .collect();
    let mut forms: Vec<String> = forms.into_iter().collect();
    forms.sort_unstable();
    forms
}

/// Byte positions of `needle` in `haystack`, ASCII case-insensitive, with overlaps.
fn scan_overlapping(haystack: &str, needle: &str) -> Vec<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .enumerate()
        .filter(|(_, w)| w.eq_ignore_ascii_case(needle))
        .map(|(i, _)| i)
        .collect()
}

/// Byte to character offset translation.
///
/// ASCII text needs no table; otherwise the byte offset of each character
/// start is recorded once and looked up by binary search.
enum CharOffsets {
    Ascii,
    Table(Vec<usize>),
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        if text.is_ascii() {
            Self::Ascii
        } else {
            Self::Table(text.char_indices().map(|(b, _)| b).collect())
        }
    }

    fn char_offset(&self, byte: usize) -> usize {
        match self {
            Self::Ascii => byte,
            // Matches start on an ASCII byte, which is always a char boundary.
            Self::Table(starts) => starts.binary_search(&byte).unwrap_or_else(|i| i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(text: &str) -> Vec<(usize, usize)> {
        compute_highlights(text)
            .into_iter()
            .map(|r| (r.start, r.end))
            .collect()
    }

    #[test]
    fn folding_is_ascii_only() {
        // U+212A KELVIN SIGN is neither a word character nor a match for "k".
        assert_eq!(ranges("x\u{212A}x k k"), vec![(0, 1), (2, 3), (4, 5), (6, 7)]);
        assert_eq!(occurrences("\u{17F}s", "s"), vec![1]);
    }

    #[test]
    fn deserialized_reversed_range_is_empty() {
        let range: HighlightRange = serde_json::from_str(r#"{"start":5,"end":2}"#).unwrap();
        assert_eq!(range.len(), 0);
        assert!(range.is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(compute_highlights("").is_empty());
        assert!(compute_highlights("  \n\t").is_empty());
    }

    #[test]
    fn single_occurrence_is_not_highlighted() {
        assert!(compute_highlights("The quick brown fox").is_empty());
    }

    #[test]
    fn repeated_word_is_highlighted() {
        assert_eq!(ranges("cat and cat"), vec![(0, 3), (8, 11)]);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(ranges("Cat cat"), ranges("cat CAT"));
        assert_eq!(ranges("Cat cat"), vec![(0, 3), (4, 7)]);
    }

    #[test]
    fn substring_occurrences_count() {
        let result = ranges("catalog cat");
        assert!(result.contains(&(0, 3)));
        assert!(result.contains(&(8, 11)));
    }

    #[test]
    fn stopwords_are_excluded() {
        assert!(compute_highlights("the the the").is_empty());
        assert!(compute_highlights("The THE the").is_empty());
    }

    #[test]
    fn overlapping_occurrences_are_all_reported() {
        assert_eq!(ranges("aaa aa"), vec![(0, 2), (1, 3), (4, 6)]);
    }

    #[test]
    fn adjacent_repeats_within_one_token() {
        // "abab" occurs once; "ab" is its own token and occurs three times
        assert_eq!(ranges("abab ab"), vec![(0, 2), (2, 4), (5, 7)]);
    }

    #[test]
    fn single_long_token_is_not_a_duplicate() {
        assert!(compute_highlights("aaaa").is_empty());
    }

    #[test]
    fn punctuation_runs_are_candidates() {
        // Only single marks are stopwords; "---" itself repeats.
        assert_eq!(ranges("wait--- what--- now"), vec![(4, 7), (12, 15)]);
    }

    #[test]
    fn single_punctuation_marks_never_qualify() {
        assert!(compute_highlights("x - y - z").is_empty());
        assert!(compute_highlights("Hi. Bye. Ok.").is_empty());
    }

    #[test]
    fn nested_candidates_overlap() {
        let result = compute_highlights("cat cats cats");
        // "cats" at 4 and 9, "cat" at 0, 4 and 9
        assert!(result.contains(&HighlightRange::new(4, 8)));
        assert!(result.contains(&HighlightRange::new(4, 7)));
        assert!(result.contains(&HighlightRange::new(0, 3)));
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn idempotent() {
        let text = "Echo echo, the echo chamber. Chamber music!";
        assert_eq!(compute_highlights(text), compute_highlights(text));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        // "ü" is two bytes; offsets must stay in characters.
        assert_eq!(ranges("über dog, dog"), vec![(5, 8), (10, 13)]);
    }

    #[test]
    fn every_range_matches_a_duplicated_form() {
        let text = "Rust is fast. Rusty tools, fast tools.";
        let chars: Vec<char> = text.chars().collect();
        let stopwords = Stopwords::default();
        let duplicates = find_duplicates(text, &stopwords);
        for range in compute_highlights(text) {
            let slice: String = chars[range.as_range()].iter().collect();
            let lower = slice.to_lowercase();
            assert!(duplicates.iter().any(|d| d.word == lower), "{lower}");
            assert!(!stopwords.contains(&lower));
        }
    }

    #[test]
    fn extra_stopwords_suppress_duplicates() {
        let stopwords = Stopwords::with_extra(["cat"]);
        assert!(compute_highlights_with("cat cat", &stopwords).is_empty());
    }

    #[test]
    fn duplicates_sorted_by_count_then_word() {
        let dups = find_duplicates("dog cat dog cat dog", &Stopwords::default());
        assert_eq!(dups[0].word, "dog");
        assert_eq!(dups[0].count(), 3);
        assert_eq!(dups[1].word, "cat");
        assert_eq!(dups[1].positions, vec![4, 12]);
    }

    #[test]
    fn occurrences_overlap_and_fold_case() {
        assert_eq!(occurrences("AaAa", "aa"), vec![0, 1, 2]);
        assert!(occurrences("abc", "").is_empty());
        assert!(occurrences("", "abc").is_empty());
    }

    #[test]
    fn scan_matches_automaton() {
        let text = "Banana bandana";
        assert_eq!(scan_overlapping(text, "ana"), occurrences(text, "ana"));
    }

    #[test]
    fn large_input_completes() {
        let text = "word ".repeat(20_000);
        assert_eq!(compute_highlights(&text).len(), 20_000);
    }

    #[test]
    fn range_helpers() {
        let r = HighlightRange::new(5, 2);
        assert!(r.is_empty());
        assert_eq!(HighlightRange::from(1..4).len(), 3);
    }
}
