//! Host integration.
//!
//! The highlighter knows nothing about editors or event loops. A host owns
//! the text, implements [`HighlightSink`] over its own styling mechanism, and
//! calls [`on_text_changed`] whenever the text changes. Each call clears the
//! previous highlights and applies a freshly computed set.

use crate::highlight::{HighlightRange, compute_highlights_with};
use crate::word_lists::Stopwords;

/// Something that can show and clear highlight styling over character ranges.
pub trait HighlightSink {
    /// Remove highlight styling from the whole buffer.
    fn clear_highlights(&mut self);

    /// Apply highlight styling to one range.
    fn apply_highlight(&mut self, range: HighlightRange);
}

/// Recompute highlights for `text` and push them into `sink`.
///
/// Returns the number of ranges applied.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn on_text_changed<S>(sink: &mut S, text: &str, stopwords: &Stopwords) -> usize
where
    S: HighlightSink + ?Sized,
{
    sink.clear_highlights();
    let ranges = compute_highlights_with(text, stopwords);
    for range in &ranges {
        sink.apply_highlight(*range);
    }
    ranges.len()
}

/// A run of characters that is either entirely highlighted or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The characters in this run.
    pub text: String,
    /// Whether the run is highlighted.
    pub marked: bool,
}

/// An in-memory text buffer with a per-character highlight mask.
///
/// Overlapping ranges simply mark the same characters again, so the mask is
/// the union of everything applied since the last clear.
#[derive(Debug, Clone, Default)]
pub struct MarkedText {
    chars: Vec<char>,
    mask: Vec<bool>,
}

impl MarkedText {
    /// A buffer holding `text` with nothing highlighted.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mask = vec![false; chars.len()];
        Self { chars, mask }
    }

    /// Replace the buffer contents and refresh highlights.
    ///
    /// Returns the number of ranges applied.
    pub fn set_text(&mut self, text: &str, stopwords: &Stopwords) -> usize {
        self.chars = text.chars().collect();
        self.mask = vec![false; self.chars.len()];
        on_text_changed(self, text, stopwords)
    }

    /// Current buffer contents.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Whether the character at `offset` is highlighted.
    pub fn is_marked(&self, offset: usize) -> bool {
        self.mask.get(offset).copied().unwrap_or(false)
    }

    /// Number of highlighted characters.
    pub fn marked_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Split the buffer into maximal highlighted / plain runs.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        for (&c, &marked) in self.chars.iter().zip(&self.mask) {
            match segments.last_mut() {
                Some(last) if last.marked == marked => last.text.push(c),
                _ => segments.push(Segment {
                    text: c.to_string(),
                    marked,
                }),
            }
        }
        segments
    }
}

impl HighlightSink for MarkedText {
    fn clear_highlights(&mut self) {
        self.mask.fill(false);
    }

    fn apply_highlight(&mut self, range: HighlightRange) {
        let end = range.end.min(self.mask.len());
        if range.start < end {
            self.mask[range.start..end].fill(true);
        }
    }
}
