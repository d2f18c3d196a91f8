use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while exporting or loading a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The parameters or artifact contents are malformed.
    #[error("Invalid model parameters: {0}")]
    Validation(String),
    /// Failed to create the destination directory.
    #[error("Unable to create artifact directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write or replace the artifact file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read an artifact file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to encode the artifact as JSON.
    #[error("Failed to serialize model artifact: {0}")]
    Serialize(serde_json::Error),
    /// The file is not a well-formed artifact document.
    #[error("Invalid model artifact at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unsupported artifact format_version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Unsupported model_type {0}")]
    UnsupportedModelType(String),
    #[error("Artifact checksum mismatch: recorded {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },
}

impl ArtifactError {
    /// True for failures of the filesystem rather than of the artifact contents.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ArtifactError::CreateDir { .. } | ArtifactError::Write { .. } | ArtifactError::Read { .. }
        )
    }
}
