//! Mark command: print text with repeated words highlighted.

use std::io::Write;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

use dupmark_core::{Config, DuplicateReport, HighlightColor, MarkedText, Stopwords, on_text_changed};

use super::read_input;

/// Arguments for the `mark` subcommand.
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// File to read (omit or `-` for stdin).
    pub file: Option<Utf8PathBuf>,

    /// Highlight color as #rrggbb.
    #[arg(long, value_name = "HEX")]
    pub highlight: Option<String>,
}

/// Print a file with every occurrence of a repeated word highlighted.
#[instrument(name = "cmd_mark", skip_all, fields(file = ?args.file))]
pub fn cmd_mark(
    args: MarkArgs,
    global_json: bool,
    config: &Config,
    stopwords: &Stopwords,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = ?args.file, highlight = ?args.highlight, "executing mark command");

    let color = match args.highlight.as_deref() {
        Some(hex) => HighlightColor::parse(hex),
        None => config.highlight_color(),
    }
    .context("failed to resolve highlight color")?;

    let input = read_input(args.file.as_deref(), max_input_bytes)?;

    if global_json {
        let report = DuplicateReport::from_text(&input.text, stopwords);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut buffer = MarkedText::new(&input.text);
    let applied = on_text_changed(&mut buffer, &input.text, stopwords);
    debug!(ranges = applied, marked = buffer.marked_count(), "highlights applied");

    let mut out = std::io::stdout().lock();
    for segment in buffer.segments() {
        if segment.marked {
            write!(
                out,
                "{}",
                segment
                    .text
                    .if_supports_color(Stream::Stdout, |t| t.on_truecolor(color.r, color.g, color.b))
            )?;
        } else {
            write!(out, "{}", segment.text)?;
        }
    }
    if !input.text.is_empty() && !input.text.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush().with_context(|| format!("failed to write {}", input.label))?;

    Ok(())
}
