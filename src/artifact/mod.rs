//! Versioned on-disk model artifacts.
//!
//! An artifact is a JSON document that describes a fitted one-vs-rest logistic regression
//! model for an inference runtime that never sees the training code:
//!
//! - `format_version`, `model_type`: what the document is and how to read it.
//! - `feature_count`, `input_name`, `output_name`: the inference interface.
//! - `class_labels` plus aligned `classes` entries carrying each class's weights and bias.
//! - `payload_sha256`: digest of the numeric payload, checked on load.
//!
//! [`export`] writes artifacts atomically; [`load`] reads them back into
//! [`ModelParameters`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dataset::ClassLabel;
use crate::ml::logreg::{ClassWeights, ModelParameters};

mod errors;
mod export;
mod load;

pub use errors::ArtifactError;
pub use export::export;
pub use load::{load, read_artifact};

/// Artifact layout version written by this crate.
pub const FORMAT_VERSION: u32 = 1;
/// Model-type tag for one-vs-rest logistic regression.
pub const MODEL_TYPE: &str = "logistic_regression_ovr";
/// Name of the feature array expected by the inference runtime.
pub const INPUT_NAME: &str = "input";
/// Name of the predicted label produced by the inference runtime.
pub const OUTPUT_NAME: &str = "classLabel";

const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Weights and bias of one class as stored in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub label: ClassLabel,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Serialized form of [`ModelParameters`] plus descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_type: String,
    pub feature_count: usize,
    pub class_labels: Vec<ClassLabel>,
    /// Aligned with `class_labels`.
    pub classes: Vec<ClassEntry>,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    #[serde(default = "default_output_name")]
    pub output_name: String,
    #[serde(default)]
    pub generator: Option<String>,
    pub payload_sha256: String,
}

fn default_input_name() -> String {
    INPUT_NAME.to_string()
}

fn default_output_name() -> String {
    OUTPUT_NAME.to_string()
}

impl ModelArtifact {
    /// Build an artifact from validated parameters.
    pub fn from_parameters(params: &ModelParameters) -> Result<Self, ArtifactError> {
        params.validate().map_err(ArtifactError::Validation)?;
        let classes: Vec<ClassEntry> = params
            .classes
            .iter()
            .map(|(&label, class)| ClassEntry {
                label,
                weights: class.weights.clone(),
                bias: class.bias,
            })
            .collect();
        let payload_sha256 = payload_digest(params.feature_dim, &classes);
        Ok(Self {
            format_version: FORMAT_VERSION,
            model_type: MODEL_TYPE.to_string(),
            feature_count: params.feature_dim,
            class_labels: params.class_labels(),
            classes,
            input_name: default_input_name(),
            output_name: default_output_name(),
            generator: Some(GENERATOR.to_string()),
            payload_sha256,
        })
    }

    /// Check version, model type, label alignment and payload digest.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        if self.model_type != MODEL_TYPE {
            return Err(ArtifactError::UnsupportedModelType(self.model_type.clone()));
        }
        if self.class_labels.len() != self.classes.len() {
            return Err(ArtifactError::Validation(format!(
                "{} class labels but {} class entries",
                self.class_labels.len(),
                self.classes.len()
            )));
        }
        for (idx, (label, entry)) in self.class_labels.iter().zip(&self.classes).enumerate() {
            if *label != entry.label {
                return Err(ArtifactError::Validation(format!(
                    "class entry {idx} has label {} but class_labels lists {label}",
                    entry.label
                )));
            }
        }
        if self.class_labels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ArtifactError::Validation(
                "class_labels must be strictly ascending".to_string(),
            ));
        }
        let computed = payload_digest(self.feature_count, &self.classes);
        if computed != self.payload_sha256 {
            return Err(ArtifactError::ChecksumMismatch {
                recorded: self.payload_sha256.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Convert back into model parameters.
    pub fn to_parameters(&self) -> Result<ModelParameters, ArtifactError> {
        self.validate()?;
        let mut params = ModelParameters::new(self.feature_count);
        for entry in &self.classes {
            params.classes.insert(
                entry.label,
                ClassWeights {
                    weights: entry.weights.clone(),
                    bias: entry.bias,
                },
            );
        }
        params.validate().map_err(ArtifactError::Validation)?;
        Ok(params)
    }
}

/// SHA-256 over a little-endian encoding of the feature count and every class entry.
fn payload_digest(feature_count: usize, classes: &[ClassEntry]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((feature_count as u64).to_le_bytes());
    for entry in classes {
        hasher.update(entry.label.to_le_bytes());
        hasher.update((entry.weights.len() as u64).to_le_bytes());
        for weight in &entry.weights {
            hasher.update(weight.to_bits().to_le_bytes());
        }
        hasher.update(entry.bias.to_bits().to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}
