//! Configuration loading and discovery.
//!
//! Settings are layered with figment, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. User config: `config.<ext>` in the platform config directory
//!    (`~/.config/dupmark/` on Linux)
//! 3. Project config: the nearest directory, walking up from the search
//!    root, that holds `.dupmark.<ext>` or `dupmark.<ext>`. The walk stops
//!    at a directory containing `.git`.
//! 4. Files passed explicitly (`--config`), in the order given
//! 5. `DUPMARK_*` environment variables
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`. When one directory holds
//! several files they are all merged: dotfiles before regular names, and
//! within each name toml < yaml < yml < json.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use dupmark_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)?;
//! let (config, sources) = ConfigLoader::new().with_project_search(&cwd).load()?;
//! println!("{:?} from {:?}", config.highlight_color, sources.primary_file());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::word_lists::Stopwords;

/// Highlight colour used when none is configured (a pale green).
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#8cf5b7";

/// How hosts address highlight ranges when printing them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Addressing {
    /// Zero-based character offsets (`12..15`).
    #[default]
    Offset,
    /// Line and column pairs (`2.4-2.7`), lines from 1, columns from 0.
    LineColumn,
}

impl Addressing {
    /// Returns the addressing mode as a kebab-case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::LineColumn => "line-column",
        }
    }
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RGB highlight colour parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl HighlightColor {
    /// Parse a `#rrggbb` (or `rrggbb`) hex colour.
    pub fn parse(value: &str) -> ConfigResult<Self> {
        let invalid = || ConfigError::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self {
            r: 0x8c,
            g: 0xf5,
            b: 0xb7,
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The configuration for dupmark.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON), then overridden by `DUPMARK_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the limit
    /// entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    pub disable_input_limit: bool,
    /// Words to ignore in addition to the built-in stopwords.
    pub extra_stopwords: Option<Vec<String>>,
    /// Highlight colour as `#rrggbb` (default `#8cf5b7`).
    pub highlight_color: Option<String>,
    /// How `ranges` output addresses highlights.
    pub addressing: Option<Addressing>,
}

impl Config {
    /// Stopwords with any configured additions.
    pub fn stopwords(&self) -> Stopwords {
        Stopwords::with_extra(self.extra_stopwords.iter().flatten())
    }

    /// The configured highlight colour, or the default.
    pub fn highlight_color(&self) -> ConfigResult<HighlightColor> {
        self.highlight_color
            .as_deref()
            .map_or_else(|| Ok(HighlightColor::default()), HighlightColor::parse)
    }

    /// Effective input limit in bytes, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(
                self.max_input_bytes
                    .unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES),
            )
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which files contributed to a loaded [`Config`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// The user-level config file, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files from the nearest project directory, in merge order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// Files passed to [`ConfigLoader::with_file`], in merge order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Every file in merge order, lowest precedence first.
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = &Utf8Path> {
        self.user_file
            .iter()
            .chain(&self.project_files)
            .chain(&self.explicit_files)
            .map(Utf8PathBuf::as_path)
    }

    /// The file whose values win, if any file was loaded.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.layers().next_back()
    }

    /// Whether no file was found at all.
    pub fn is_empty(&self) -> bool {
        self.layers().next().is_none()
    }
}

const APP_NAME: &str = "dupmark";
const ENV_PREFIX: &str = "DUPMARK_";

/// On-disk config formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

/// Extensions searched for, in merge order.
static CONFIG_FORMATS: [(&str, FileFormat); 4] = [
    ("toml", FileFormat::Toml),
    ("yaml", FileFormat::Yaml),
    ("yml", FileFormat::Yaml),
    ("json", FileFormat::Json),
];

impl FileFormat {
    /// Format for `path`; anything unrecognized is read as TOML.
    fn of(path: &Utf8Path) -> Self {
        path.extension()
            .and_then(|ext| {
                CONFIG_FORMATS
                    .iter()
                    .find(|(known, _)| *known == ext)
                    .map(|&(_, format)| format)
            })
            .unwrap_or(Self::Toml)
    }

    fn merge_into(self, figment: Figment, path: &Utf8Path) -> Figment {
        let path = path.as_std_path();
        match self {
            Self::Toml => figment.merge(Toml::file_exact(path)),
            Self::Yaml => figment.merge(Yaml::file_exact(path)),
            Self::Json => figment.merge(Json::file_exact(path)),
        }
    }
}

/// Builder that discovers config files and merges them into a [`Config`].
#[derive(Debug)]
pub struct ConfigLoader {
    search_from: Option<Utf8PathBuf>,
    read_user_config: bool,
    stop_marker: Option<String>,
    files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads the user config and stops project search at `.git`.
    pub fn new() -> Self {
        Self {
            search_from: None,
            read_user_config: true,
            stop_marker: Some(".git".to_string()),
            files: Vec::new(),
        }
    }

    /// Look for project config starting at `dir` and climbing toward the root.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.search_from = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Whether to read `config.<ext>` from the user config directory.
    pub const fn with_user_config(mut self, read: bool) -> Self {
        self.read_user_config = read;
        self
    }

    /// Stop the project search at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.stop_marker = Some(marker.into());
        self
    }

    /// Let the project search climb all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.stop_marker = None;
        self
    }

    /// Merge `path` after everything discovered. Later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Discover and merge every source. Missing files are not an error.
    #[tracing::instrument(skip(self), fields(search_from = ?self.search_from))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        Self::extract(sources)
    }

    /// Like [`load`](Self::load), but fails with [`ConfigError::NotFound`]
    /// when no config file exists anywhere.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        if sources.is_empty() {
            return Err(ConfigError::NotFound);
        }
        Self::extract(sources)
    }

    fn discover(self) -> ConfigSources {
        let user_file = if self.read_user_config {
            find_user_file()
        } else {
            None
        };
        let project_files = self
            .search_from
            .as_deref()
            .map(|dir| find_project_files(dir, self.stop_marker.as_deref()))
            .unwrap_or_default();
        ConfigSources {
            user_file,
            project_files,
            explicit_files: self.files,
        }
    }

    fn extract(sources: ConfigSources) -> ConfigResult<(Config, ConfigSources)> {
        let figment = sources
            .layers()
            .fold(
                Figment::from(Serialized::defaults(Config::default())),
                |figment, path| {
                    tracing::debug!(%path, "merging config file");
                    FileFormat::of(path).merge_into(figment, path)
                },
            )
            .merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            primary = ?sources.primary_file(),
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok((config, sources))
    }
}

/// Config files in the nearest directory at or above `start` that has any.
fn find_project_files(start: &Utf8Path, stop_marker: Option<&str>) -> Vec<Utf8PathBuf> {
    for dir in start.ancestors() {
        let found: Vec<Utf8PathBuf> = [".", ""]
            .into_iter()
            .flat_map(|dot| {
                CONFIG_FORMATS
                    .iter()
                    .map(move |(ext, _)| dir.join(format!("{dot}{APP_NAME}.{ext}")))
            })
            .filter(|path| path.is_file())
            .collect();
        if !found.is_empty() {
            return found;
        }
        // Files beside the marker were checked above; only the climb stops.
        if stop_marker.is_some_and(|marker| dir.join(marker).exists()) {
            break;
        }
    }
    Vec::new()
}

fn find_user_file() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    CONFIG_FORMATS
        .iter()
        .map(|(ext, _)| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn utf8_dir(path: &Path) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).ok()
}

/// Platform config directory for dupmark (`~/.config/dupmark` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    project_dirs().and_then(|dirs| utf8_dir(dirs.config_dir()))
}

/// Machine-local data directory for dupmark (`~/.local/share/dupmark` on
/// Linux). Logs go under `logs/` here by default.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    project_dirs().and_then(|dirs| utf8_dir(dirs.data_local_dir()))
}
