//! Tokenization.
//!
//! Splits free text into word-like tokens and punctuation runs. Spans are
//! reported in characters, not bytes, so hosts can address them the same way
//! an editor widget does.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Word characters, optionally joined by punctuation runs (`e.g`,
/// `well---known`), or a bare punctuation run (`---`, `!!!`).
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_']+(?:[.,;:!?\-]+[A-Za-z0-9_']+)*|[.,;:!?\-]+").expect("valid regex")
});

/// A token extracted from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercase normal form.
    pub normal: String,
    /// Half-open character range in the source text.
    pub span: Range<usize>,
}

/// Extract tokens left to right.
///
/// Characters outside the grammar (whitespace, brackets, quotes other than
/// the apostrophe, non-ASCII letters) are skipped and never part of a token.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;

    for m in TOKEN_PATTERN.find_iter(text) {
        char_pos += text[byte_pos..m.start()].chars().count();
        // The grammar is ASCII-only, so bytes and chars agree inside a match.
        let start = char_pos;
        let end = start + m.len();

        tokens.push(Token {
            normal: m.as_str().to_lowercase(),
            span: start..end,
        });

        byte_pos = m.end();
        char_pos = end;
    }

    tracing::trace!(count = tokens.len(), "tokenized");
    tokens
}
