//! Check command: fail when a word is repeated.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use dupmark_core::{DuplicateReport, Stopwords};

use super::read_input;

/// How many repeated words to name in the failure message.
const SHOWN_WORDS: usize = 5;

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File to read (omit or `-` for stdin).
    pub file: Option<Utf8PathBuf>,
}

/// Exit non-zero if the input repeats any non-stopword.
#[instrument(name = "cmd_check", skip_all, fields(file = ?args.file))]
pub fn cmd_check(
    args: CheckArgs,
    global_json: bool,
    stopwords: &Stopwords,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = ?args.file, "executing check command");

    let input = read_input(args.file.as_deref(), max_input_bytes)?;
    let report = DuplicateReport::from_text(&input.text, stopwords);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.has_duplicates() {
        let shown: Vec<String> = report
            .duplicates
            .iter()
            .take(SHOWN_WORDS)
            .map(|d| format!("\"{}\" ({}x)", d.word, d.count()))
            .collect();
        let more = report.total_duplicates.saturating_sub(SHOWN_WORDS);
        let suffix = if more > 0 {
            format!(" and {more} more")
        } else {
            String::new()
        };
        bail!(
            "{} repeats {} words: {}{}. Vary the wording.",
            input.label,
            report.total_duplicates,
            shown.join(", "),
            suffix,
        );
    }

    println!("{} {} has no repeated words", "PASS:".green(), input.label);
    Ok(())
}
