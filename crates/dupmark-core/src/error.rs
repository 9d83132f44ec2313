//! Error types for dupmark-core.
//!
//! Highlight computation itself cannot fail; only configuration loading and
//! validation produce errors.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A highlight colour was not a `#rrggbb` hex triple.
    #[error("invalid highlight color: {value:?} (expected #rrggbb)")]
    InvalidColor {
        /// The rejected value.
        value: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
