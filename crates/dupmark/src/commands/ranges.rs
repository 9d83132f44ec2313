//! Ranges command: list highlight ranges.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, instrument};

use dupmark_core::{Addressing, HighlightRange, LineIndex, Position, Stopwords, compute_highlights_with};

use super::read_input;

/// Arguments for the `ranges` subcommand.
#[derive(Args, Debug)]
pub struct RangesArgs {
    /// File to read (omit or `-` for stdin).
    pub file: Option<Utf8PathBuf>,

    /// How to address ranges in text output.
    #[arg(long, value_enum)]
    pub addressing: Option<Addressing>,
}

/// One highlight range with the text it covers.
#[derive(Debug, Serialize)]
struct RangeEntry {
    start: usize,
    end: usize,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_position: Option<Position>,
}

impl RangeEntry {
    fn new(range: HighlightRange, chars: &[char], index: Option<&LineIndex>) -> Self {
        let text = chars
            .get(range.as_range())
            .map(|cs| cs.iter().collect::<String>())
            .unwrap_or_default();
        let located = index.map(|index| index.locate(range));
        Self {
            start: range.start,
            end: range.end,
            text,
            start_position: located.map(|(start, _)| start),
            end_position: located.map(|(_, end)| end),
        }
    }

    fn address(&self) -> String {
        match (self.start_position, self.end_position) {
            (Some(start), Some(end)) => format!("{start}-{end}"),
            _ => format!("{}..{}", self.start, self.end),
        }
    }
}

/// List every highlight range in a file.
#[instrument(name = "cmd_ranges", skip_all, fields(file = ?args.file))]
pub fn cmd_ranges(
    args: RangesArgs,
    global_json: bool,
    config_addressing: Option<Addressing>,
    stopwords: &Stopwords,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let addressing = args.addressing.or(config_addressing).unwrap_or_default();
    debug!(file = ?args.file, %addressing, "executing ranges command");

    let input = read_input(args.file.as_deref(), max_input_bytes)?;
    let ranges = compute_highlights_with(&input.text, stopwords);

    let chars: Vec<char> = input.text.chars().collect();
    let index = (addressing == Addressing::LineColumn).then(|| LineIndex::new(&input.text));
    let entries: Vec<RangeEntry> = ranges
        .into_iter()
        .map(|r| RangeEntry::new(r, &chars, index.as_ref()))
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}: {}", input.label, "no repeated words".dimmed());
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}\t{}",
            entry.address(),
            entry.text.if_supports_color(Stream::Stdout, |t| t.cyan())
        );
    }

    Ok(())
}
