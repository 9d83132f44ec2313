//! Logging setup: human-readable logs on stderr, JSON logs to a daily file.
//!
//! Stdout is reserved for command output (and the MCP protocol under
//! `serve`), so nothing here ever writes to it.
//!
//! ## Log File Location
//!
//! 1. `DUPMARK_LOG_PATH` - explicit file path
//! 2. `DUPMARK_LOG_DIR` - directory, file named `dupmark.log.<date>`
//! 3. `log_dir` from configuration
//! 4. `<data_local_dir>/dupmark/logs`
//!
//! When the directory cannot be created, file logging is skipped.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "dupmark.log";

/// Where file logs go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Directory for the log file, if any.
    pub log_dir: Option<PathBuf>,
    /// File name (or rolling prefix) inside `log_dir`.
    pub file_name: String,
    /// Roll to a new file each day. Off when an explicit path is given.
    pub rolling: bool,
}

impl ObservabilityConfig {
    /// Resolve the log location from the environment, falling back to
    /// `config_log_dir` and then the platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os("DUPMARK_LOG_PATH").map(PathBuf::from),
            std::env::var_os("DUPMARK_LOG_DIR").map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = log_path
            && let Some(name) = path.file_name()
        {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            return Self {
                log_dir: Some(dir),
                file_name: name.to_string_lossy().into_owned(),
                rolling: false,
            };
        }

        let log_dir = env_log_dir.or(config_log_dir).or_else(|| {
            dupmark_core::config::user_data_local_dir().map(|dir| dir.join("logs").into_std_path_buf())
        });
        Self {
            log_dir,
            file_name: LOG_FILE_PREFIX.to_string(),
            rolling: true,
        }
    }
}

/// Keeps the background log writer alive. Drop it last.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` means errors only, `-v`
/// means debug, `-vv` or more means trace, and the configured level applies
/// when neither flag is given.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_for(quiet, verbose, default_level))
}

fn level_for(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, file_guard) = match config.log_dir.as_deref() {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = if config.rolling {
                tracing_appender::rolling::daily(dir, &config.file_name)
            } else {
                tracing_appender::rolling::never(dir, &config.file_name)
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(ObservabilityGuard {
        _file_guard: file_guard,
    })
}
