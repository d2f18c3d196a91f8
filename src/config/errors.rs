use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur while assembling the training configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// A setting is out of range.
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("Invalid {flag} value: {value}")]
    InvalidValue { flag: String, value: String },
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}
