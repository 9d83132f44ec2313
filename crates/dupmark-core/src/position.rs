//! Character offset to line/column mapping.
//!
//! Highlights are addressed by character offset. Hosts that address text by
//! line and column (editor widgets, terminal output) translate through a
//! [`LineIndex`] built from the same snapshot.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::highlight::HighlightRange;

/// A line/column address. Lines start at 1, columns at 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based character column within the line.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// Line start offsets for one text snapshot.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Index the line breaks of `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;
        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
            len = i + 1;
        }
        Self { line_starts, len }
    }

    /// Number of lines (an empty text has one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of a character offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        Position {
            line,
            column: offset - self.line_starts[line - 1],
        }
    }

    /// Start and end positions of a range.
    pub fn locate(&self, range: HighlightRange) -> (Position, Position) {
        (self.position(range.start), self.position(range.end))
    }
}
