//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;

pub mod check;
pub mod info;
pub mod mark;
pub mod ranges;
#[cfg(feature = "mcp")]
pub mod serve;

/// Text read from a file or stdin, with a label for messages.
#[derive(Debug)]
pub struct Input {
    /// File path, or `<stdin>`.
    pub label: String,
    /// Decoded text. Invalid UTF-8 is replaced with U+FFFD.
    pub text: String,
}

/// Read input from `path`, or stdin when `path` is `None` or `-`, enforcing
/// the configured size limit.
pub fn read_input(path: Option<&Utf8Path>, max_bytes: Option<usize>) -> anyhow::Result<Input> {
    match path {
        Some(path) if path.as_str() != "-" => read_input_file(path, max_bytes),
        _ => read_stdin(max_bytes),
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<Input> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let bytes = std::fs::read(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    Ok(Input {
        label: path.to_string(),
        text: decode(bytes),
    })
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<Input> {
    let mut bytes = Vec::new();
    let stdin = std::io::stdin().lock();
    match max_bytes {
        Some(max) => {
            // One byte past the limit is enough to tell it was exceeded.
            let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
            stdin
                .take(limit)
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            if bytes.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            let mut stdin = stdin;
            stdin
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
        }
    }
    Ok(Input {
        label: "<stdin>".to_string(),
        text: decode(bytes),
    })
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("input is not valid UTF-8, replacing invalid sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
