//! Serializable duplicate report.
//!
//! Derives `Serialize`, `Deserialize`, and `JsonSchema` for use in both CLI
//! JSON output and MCP tool responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::highlight::{DuplicateWord, HighlightRange, find_duplicates};
use crate::word_lists::Stopwords;

/// Duplicate words found in a text and the ranges to highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DuplicateReport {
    /// Number of distinct duplicated forms.
    pub total_duplicates: usize,
    /// Number of distinct highlight ranges.
    pub total_ranges: usize,
    /// Duplicated forms, most frequent first.
    pub duplicates: Vec<DuplicateWord>,
    /// Highlight ranges in ascending order.
    pub ranges: Vec<HighlightRange>,
}

impl DuplicateReport {
    /// Analyze `text`.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn from_text(text: &str, stopwords: &Stopwords) -> Self {
        let duplicates = find_duplicates(text, stopwords);
        let mut ranges: Vec<HighlightRange> =
            duplicates.iter().flat_map(DuplicateWord::ranges).collect();
        ranges.sort_unstable();
        ranges.dedup();

        Self {
            total_duplicates: duplicates.len(),
            total_ranges: ranges.len(),
            duplicates,
            ranges,
        }
    }

    /// Whether any duplicate was found.
    pub const fn has_duplicates(&self) -> bool {
        self.total_duplicates > 0
    }
}
