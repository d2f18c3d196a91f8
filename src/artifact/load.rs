use std::path::Path;

use serde::Deserialize;

use super::{ArtifactError, FORMAT_VERSION, ModelArtifact};
use crate::ml::logreg::ModelParameters;

/// Only the version field, read before committing to a full layout.
#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

/// Load an artifact from disk and convert it back into model parameters.
pub fn load(path: &Path) -> Result<ModelParameters, ArtifactError> {
    read_artifact(path)?.to_parameters()
}

/// Read and validate an artifact without converting it.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let probe: VersionProbe =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if probe.format_version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            found: probe.format_version,
            expected: FORMAT_VERSION,
        });
    }
    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    artifact.validate()?;
    tracing::debug!(
        path = %path.display(),
        classes = artifact.class_labels.len(),
        "Loaded model artifact"
    );
    Ok(artifact)
}
