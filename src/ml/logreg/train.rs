use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::objective::BinaryLogLoss;
use super::{ClassWeights, ModelParameters};
use crate::dataset::{ClassLabel, Dataset};
use crate::ml::optim::{MinimizeOptions, Minimum, minimize};

/// Multiclass decomposition used by [`fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// One independent binary classifier per class.
    #[default]
    #[serde(rename = "ovr")]
    OneVsRest,
}

/// Training hyperparameters for the logistic regression trainer.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub strategy: Strategy,
    /// Penalty `lambda` on the squared weight norm.
    pub regularization_strength: f64,
    /// Relative objective decrease below which a class is considered converged.
    pub convergence_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::OneVsRest,
            regularization_strength: 0.5,
            convergence_tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

impl FitOptions {
    pub fn validate(&self) -> Result<(), String> {
        if !self.regularization_strength.is_finite() || self.regularization_strength <= 0.0 {
            return Err(format!(
                "regularization_strength must be positive, got {}",
                self.regularization_strength
            ));
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(format!(
                "convergence_tolerance must be positive, got {}",
                self.convergence_tolerance
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        Ok(())
    }

    fn minimize_options(&self) -> MinimizeOptions {
        MinimizeOptions {
            tolerance: self.convergence_tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// The dataset cannot be trained on.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("dataset is empty")]
    Empty,
    #[error("samples have no features")]
    NoFeatures,
    #[error("sample {index} has {found} features (expected {expected})")]
    InconsistentDimension {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("sample {index} contains a non-finite feature value")]
    NonFinite { index: usize },
    #[error("dataset has {found} distinct label(s); at least 2 are required")]
    TooFewClasses { found: usize },
}

/// Why [`fit`] refused to train.
#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    /// Hyperparameters are out of range; nothing about the data was checked.
    #[error("invalid fit options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Convergence summary for one binary sub-problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFit {
    pub label: ClassLabel,
    pub positives: usize,
    pub iterations: usize,
    pub loss: f64,
    pub converged: bool,
}

/// Fitted parameters plus per-class convergence details.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub parameters: ModelParameters,
    pub classes: Vec<ClassFit>,
}

impl FitOutcome {
    /// True when at least one class stopped before reaching the tolerance.
    pub fn is_degraded(&self) -> bool {
        self.classes.iter().any(|class| !class.converged)
    }

    pub fn into_parameters(self) -> ModelParameters {
        self.parameters
    }
}

/// Fit a logistic regression classifier to `dataset`.
pub fn fit(dataset: &Dataset, options: &FitOptions) -> Result<FitOutcome, FitError> {
    options.validate().map_err(FitError::InvalidOptions)?;
    let feature_dim = check_dataset(dataset)?;
    let labels = dataset.labels();
    if labels.len() < 2 {
        return Err(DataError::TooFewClasses {
            found: labels.len(),
        }
        .into());
    }

    let rows: Vec<&[f64]> = dataset
        .iter()
        .map(|sample| sample.features.as_slice())
        .collect();
    let mut parameters = ModelParameters::new(feature_dim);
    let mut classes = Vec::with_capacity(labels.len());

    match options.strategy {
        Strategy::OneVsRest => {
            for label in labels {
                let targets: Vec<f64> = dataset
                    .iter()
                    .map(|sample| if sample.label == label { 1.0 } else { 0.0 })
                    .collect();
                let (weights, minimum) = fit_binary(&rows, &targets, feature_dim, options);
                if minimum.converged {
                    tracing::debug!(
                        label,
                        iterations = minimum.iterations,
                        loss = minimum.value,
                        "Class converged"
                    );
                } else {
                    tracing::warn!(
                        label,
                        iterations = minimum.iterations,
                        loss = minimum.value,
                        "Class did not converge; keeping best parameters found"
                    );
                }
                classes.push(ClassFit {
                    label,
                    positives: dataset.count_label(label),
                    iterations: minimum.iterations,
                    loss: minimum.value,
                    converged: minimum.converged,
                });
                parameters.classes.insert(label, weights);
            }
        }
    }

    Ok(FitOutcome {
        parameters,
        classes,
    })
}

/// Fit a single binary classifier on 0/1 `targets`.
///
/// Targets that are all 0 or all 1 still terminate: the weights stay bounded by the penalty
/// and the bias drifts only until the objective stops improving by the tolerance.
pub fn fit_binary(
    rows: &[&[f64]],
    targets: &[f64],
    feature_dim: usize,
    options: &FitOptions,
) -> (ClassWeights, Minimum) {
    let objective = BinaryLogLoss::new(rows, targets, feature_dim, options.regularization_strength);
    let minimum = minimize(
        &objective,
        vec![0.0; feature_dim + 1],
        &options.minimize_options(),
    );
    let weights = ClassWeights {
        weights: minimum.point[..feature_dim].to_vec(),
        bias: minimum.point[feature_dim],
    };
    (weights, minimum)
}

fn check_dataset(dataset: &Dataset) -> Result<usize, DataError> {
    let first = dataset.samples.first().ok_or(DataError::Empty)?;
    let expected = first.features.len();
    if expected == 0 {
        return Err(DataError::NoFeatures);
    }
    for (index, sample) in dataset.iter().enumerate() {
        if sample.features.len() != expected {
            return Err(DataError::InconsistentDimension {
                index,
                expected,
                found: sample.features.len(),
            });
        }
        if sample.features.iter().any(|value| !value.is_finite()) {
            return Err(DataError::NonFinite { index });
        }
    }
    Ok(expected)
}
