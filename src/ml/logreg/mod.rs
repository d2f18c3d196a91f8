//! One-vs-rest logistic regression.
//!
//! [`fit`] trains one binary classifier per class and returns plain [`ModelParameters`];
//! persisting them is left to [`crate::artifact`].

use std::collections::BTreeMap;

use crate::dataset::{ClassLabel, Dataset};
use crate::ml::metrics::{self, Evaluation};

mod objective;
mod train;

pub use train::{
    ClassFit, DataError, FitError, FitOptions, FitOutcome, Strategy, fit, fit_binary,
};

/// Weight vector and bias of one binary classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassWeights {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl ClassWeights {
    /// Raw score `w·x + b`.
    pub fn decision(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }
}

/// Fitted per-class parameters keyed by class label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelParameters {
    pub feature_dim: usize,
    pub classes: BTreeMap<ClassLabel, ClassWeights>,
}

impl ModelParameters {
    pub fn new(feature_dim: usize) -> Self {
        Self {
            feature_dim,
            classes: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class labels in ascending order.
    pub fn class_labels(&self) -> Vec<ClassLabel> {
        self.classes.keys().copied().collect()
    }

    pub fn get(&self, label: ClassLabel) -> Option<&ClassWeights> {
        self.classes.get(&label)
    }

    /// Check that the parameters are non-empty, finite and share one dimensionality.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("No classes defined".to_string());
        }
        if self.feature_dim == 0 {
            return Err("feature_dim must be greater than zero".to_string());
        }
        for (label, class) in &self.classes {
            if class.weights.len() != self.feature_dim {
                return Err(format!(
                    "Class {label} has {} weights (expected {})",
                    class.weights.len(),
                    self.feature_dim
                ));
            }
            if !class.bias.is_finite() || class.weights.iter().any(|w| !w.is_finite()) {
                return Err(format!("Class {label} has non-finite parameters"));
            }
        }
        Ok(())
    }

    /// Per-class decision scores in label order, or empty on a dimension mismatch.
    pub fn decision_function(&self, features: &[f64]) -> Vec<(ClassLabel, f64)> {
        if features.len() != self.feature_dim {
            return Vec::new();
        }
        self.classes
            .iter()
            .map(|(&label, class)| (label, class.decision(features)))
            .collect()
    }

    /// One-vs-rest probability estimates: per-class sigmoids normalized to sum to one.
    pub fn predict_proba(&self, features: &[f64]) -> Vec<(ClassLabel, f64)> {
        let scores = self.decision_function(features);
        let mut proba: Vec<(ClassLabel, f64)> = scores
            .into_iter()
            .map(|(label, score)| (label, sigmoid(score)))
            .collect();
        let sum: f64 = proba.iter().map(|(_, p)| p).sum();
        if sum > 0.0 {
            for (_, p) in proba.iter_mut() {
                *p /= sum;
            }
        } else if !proba.is_empty() {
            let uniform = 1.0 / proba.len() as f64;
            for (_, p) in proba.iter_mut() {
                *p = uniform;
            }
        }
        proba
    }

    /// Label with the highest decision score. Ties resolve to the smallest label.
    pub fn predict(&self, features: &[f64]) -> Option<ClassLabel> {
        let mut best: Option<(ClassLabel, f64)> = None;
        for (label, score) in self.decision_function(features) {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }
        best.map(|(label, _)| label)
    }

    /// Evaluate predictions against the labels of `dataset`.
    pub fn evaluate(&self, dataset: &Dataset) -> Evaluation {
        metrics::evaluate(&self.class_labels(), dataset, |features| {
            self.predict(features)
        })
    }
}

/// Numerically stable logistic sigmoid.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
