use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::dataset::SynthesisOptions;
use crate::ml::logreg::{FitOptions, Strategy};

/// Default artifact destination.
pub const DEFAULT_OUTPUT_PATH: &str = "SimpleClassifier.json";

/// Every setting of a synthesize → fit → export run.
///
/// Missing TOML keys fall back to [`TrainingConfig::default`], which reproduces a
/// 1000-sample, 2-feature dataset with seed 42. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub sample_count: usize,
    pub feature_dim: usize,
    pub informative_dim: usize,
    pub redundant_dim: usize,
    pub repeated_dim: usize,
    pub class_count: usize,
    pub clusters_per_class: usize,
    pub class_sep: f64,
    pub flip_fraction: f64,
    pub hypercube: bool,
    pub shuffle: bool,
    pub seed: u64,
    pub strategy: Strategy,
    pub regularization_strength: f64,
    pub convergence_tolerance: f64,
    pub max_iterations: usize,
    pub output_path: PathBuf,
    /// Directory for log files; logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let synthesis = SynthesisOptions::default();
        let fit = FitOptions::default();
        Self {
            sample_count: synthesis.sample_count,
            feature_dim: synthesis.feature_dim,
            informative_dim: synthesis.informative_dim,
            redundant_dim: synthesis.redundant_dim,
            repeated_dim: synthesis.repeated_dim,
            class_count: synthesis.class_count,
            clusters_per_class: synthesis.clusters_per_class,
            class_sep: synthesis.class_sep,
            flip_fraction: synthesis.flip_fraction,
            hypercube: synthesis.hypercube,
            shuffle: synthesis.shuffle,
            seed: synthesis.seed,
            strategy: fit.strategy,
            regularization_strength: fit.regularization_strength,
            convergence_tolerance: fit.convergence_tolerance,
            max_iterations: fit.max_iterations,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            log_dir: None,
        }
    }
}

impl TrainingConfig {
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            sample_count: self.sample_count,
            feature_dim: self.feature_dim,
            informative_dim: self.informative_dim,
            redundant_dim: self.redundant_dim,
            repeated_dim: self.repeated_dim,
            class_count: self.class_count,
            clusters_per_class: self.clusters_per_class,
            class_sep: self.class_sep,
            flip_fraction: self.flip_fraction,
            hypercube: self.hypercube,
            shuffle: self.shuffle,
            seed: self.seed,
        }
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            strategy: self.strategy,
            regularization_strength: self.regularization_strength,
            convergence_tolerance: self.convergence_tolerance,
            max_iterations: self.max_iterations,
        }
    }

    /// Check trainer and output settings. Synthesis settings are checked by the synthesizer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.regularization_strength.is_finite() || self.regularization_strength <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "regularization_strength",
                reason: format!("must be positive, got {}", self.regularization_strength),
            });
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "convergence_tolerance",
                reason: format!("must be positive, got {}", self.convergence_tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_reference_run() {
        let config = TrainingConfig::default();
        let synthesis = config.synthesis_options();
        assert_eq!(synthesis, SynthesisOptions::new(1000, 2, 2, 0, 0, 42));
        assert_eq!(config.fit_options(), FitOptions::default());
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_trainer_settings() {
        let config = TrainingConfig {
            regularization_strength: -1.0,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "regularization_strength",
                ..
            })
        ));
        let config = TrainingConfig {
            max_iterations: 0,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
        let config = TrainingConfig {
            output_path: PathBuf::new(),
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
