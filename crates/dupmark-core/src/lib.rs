//! Core library for dupmark.
//!
//! Finds repeated word-like tokens in text and turns them into character
//! ranges a host can highlight. The host owns the text; on every change it
//! asks for a fresh set of ranges and replaces whatever it showed before.
//!
//! # Modules
//!
//! - [`text`] - Tokenization
//! - [`word_lists`] - Stopwords excluded from duplicate detection
//! - [`highlight`] - Duplicate detection and highlight ranges
//! - [`host`] - Callback contract between a host and the highlighter
//! - [`position`] - Character offset to line/column mapping
//! - [`report`] - Serializable duplicate report
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use dupmark_core::{HighlightRange, compute_highlights};
//!
//! let ranges = compute_highlights("catalog cat");
//! assert!(ranges.contains(&HighlightRange::new(0, 3)));
//! assert!(ranges.contains(&HighlightRange::new(8, 11)));
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod highlight;
pub mod host;
pub mod position;
pub mod report;
pub mod text;
pub mod word_lists;

pub use config::{Addressing, Config, ConfigLoader, ConfigSources, HighlightColor, LogLevel};
pub use error::{ConfigError, ConfigResult};
pub use highlight::{
    DuplicateWord, HighlightRange, compute_highlights, compute_highlights_with, find_duplicates,
    occurrences,
};
pub use host::{HighlightSink, MarkedText, Segment, on_text_changed};
pub use position::{LineIndex, Position};
pub use report::DuplicateReport;
pub use text::{Token, tokenize};
pub use word_lists::Stopwords;

/// Default maximum input size hosts accept (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
