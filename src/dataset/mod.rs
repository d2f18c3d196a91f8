//! Labeled sample sets used for training.
//!
//! Datasets are plain in-memory rows: each [`Sample`] pairs a feature vector with an integer
//! class label. The synthesizer in [`synth`] produces reproducible datasets from a seed.

use std::collections::BTreeSet;

pub mod synth;

pub use synth::{SynthesisError, SynthesisOptions, synthesize};

/// Integer class identifier.
pub type ClassLabel = i64;

/// A single labeled feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: ClassLabel,
}

/// Ordered sequence of labeled samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature length of the first sample, if any.
    pub fn feature_dim(&self) -> Option<usize> {
        self.samples.first().map(|sample| sample.features.len())
    }

    /// Distinct labels in ascending order.
    pub fn labels(&self) -> BTreeSet<ClassLabel> {
        self.samples.iter().map(|sample| sample.label).collect()
    }

    /// Number of samples carrying `label`.
    pub fn count_label(&self, label: ClassLabel) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.label == label)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(features: &[f64], label: ClassLabel) -> Sample {
        Sample {
            features: features.to_vec(),
            label,
        }
    }

    #[test]
    fn labels_are_sorted_and_distinct() {
        let dataset = Dataset::new(vec![
            sample(&[0.0], 2),
            sample(&[1.0], 0),
            sample(&[2.0], 2),
        ]);
        let labels: Vec<_> = dataset.labels().into_iter().collect();
        assert_eq!(labels, vec![0, 2]);
        assert_eq!(dataset.count_label(2), 2);
    }

    #[test]
    fn empty_dataset_has_no_dim() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert_eq!(dataset.feature_dim(), None);
    }
}
