//! End-to-end training run: synthesize, fit, evaluate, export.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::artifact::{self, ArtifactError};
use crate::config::{ConfigError, TrainingConfig};
use crate::dataset::{self, ClassLabel, SynthesisError};
use crate::ml::logreg::{self, DataError, FitError};

/// Any condition that aborts a training run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Synthesis parameters were rejected before any training happened.
    #[error("Configuration error: {0}")]
    Synthesis(#[from] SynthesisError),
    /// Trainer hyperparameters were rejected before any fitting happened.
    #[error("Configuration error: {0}")]
    FitOptions(String),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Export failed: {0}")]
    Artifact(#[from] ArtifactError),
}

impl From<FitError> for PipelineError {
    fn from(err: FitError) -> Self {
        match err {
            FitError::InvalidOptions(reason) => PipelineError::FitOptions(reason),
            FitError::Data(err) => PipelineError::Data(err),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub artifact_path: PathBuf,
    pub class_labels: Vec<ClassLabel>,
    pub sample_count: usize,
    pub feature_dim: usize,
    /// Accuracy of the fitted model on its own training data.
    pub train_accuracy: f64,
    /// At least one per-class fit stopped before reaching the tolerance.
    pub degraded: bool,
}

/// Run the whole pipeline for `config`, returning once the artifact is durably written.
pub fn run(config: &TrainingConfig) -> Result<RunSummary, PipelineError> {
    config.validate()?;

    let synthesis = config.synthesis_options();
    let data = dataset::synthesize(&synthesis)?;
    info!(
        samples = data.len(),
        features = synthesis.feature_dim,
        seed = synthesis.seed,
        "Synthesized dataset"
    );

    let outcome = logreg::fit(&data, &config.fit_options())?;
    let degraded = outcome.is_degraded();
    for class in &outcome.classes {
        info!(
            label = class.label,
            positives = class.positives,
            iterations = class.iterations,
            loss = class.loss,
            converged = class.converged,
            "Fitted class"
        );
    }
    if degraded {
        warn!("Training did not converge; exporting best-found parameters");
    }
    let params = outcome.into_parameters();

    let evaluation = params.evaluate(&data);
    info!(accuracy = evaluation.accuracy, "Training accuracy");
    for stats in &evaluation.per_class {
        info!(
            label = stats.label,
            precision = stats.precision,
            recall = stats.recall,
            f1 = stats.f1(),
            support = stats.support,
            "Class metrics"
        );
    }

    artifact::export(&params, &config.output_path)?;

    Ok(RunSummary {
        artifact_path: config.output_path.clone(),
        class_labels: params.class_labels(),
        sample_count: data.len(),
        feature_dim: params.feature_dim,
        train_accuracy: evaluation.accuracy,
        degraded,
    })
}
