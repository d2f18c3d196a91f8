//! Evaluation metrics for classification models.

use crate::dataset::{ClassLabel, Dataset};

#[derive(Debug, Clone, PartialEq)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    pub label: ClassLabel,
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

impl PerClassStats {
    pub fn f1(&self) -> f64 {
        if self.precision + self.recall == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / (self.precision + self.recall)
        }
    }
}

/// Summary of a model's predictions over a labeled dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub per_class: Vec<PerClassStats>,
    /// Samples whose true label is unknown to the model or whose prediction failed.
    pub skipped: usize,
}

/// Compare `predict` against every sample label of `dataset`.
///
/// `labels` fixes the row/column order of the confusion matrix.
pub fn evaluate<F>(labels: &[ClassLabel], dataset: &Dataset, mut predict: F) -> Evaluation
where
    F: FnMut(&[f64]) -> Option<ClassLabel>,
{
    let index_of = |label: ClassLabel| labels.iter().position(|&known| known == label);
    let mut confusion = ConfusionMatrix::new(labels.len());
    let mut skipped = 0usize;
    for sample in dataset.iter() {
        let truth = index_of(sample.label);
        let predicted = predict(sample.features.as_slice()).and_then(index_of);
        match (truth, predicted) {
            (Some(truth), Some(predicted)) => confusion.add(truth, predicted),
            _ => skipped += 1,
        }
    }
    let per_class = precision_recall_by_class(&confusion)
        .into_iter()
        .zip(labels)
        .map(|(stats, &label)| PerClassStats { label, ..stats })
        .collect();
    Evaluation {
        accuracy: accuracy(&confusion),
        confusion,
        per_class,
        skipped,
    }
}

/// Compute per-class precision and recall from a confusion matrix.
///
/// Labels are filled with the class index; [`evaluate`] replaces them with class labels.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f64;
        let mut fp = 0f64;
        let mut fn_ = 0f64;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += v as f64;
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += cm.get(i, class_idx) as f64;
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        stats.push(PerClassStats {
            label: class_idx as ClassLabel,
            precision,
            recall,
            support,
        });
    }
    stats
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let mut correct = 0u64;
    let mut total = 0u64;
    for truth in 0..cm.n_classes {
        for predicted in 0..cm.n_classes {
            let v = cm.get(truth, predicted) as u64;
            total += v;
            if truth == predicted {
                correct += v;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        (correct as f64) / (total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;

    #[test]
    fn accuracy_and_recall_from_counts() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(0, 0);
        cm.add(0, 0);
        cm.add(0, 1);
        cm.add(1, 1);
        assert!((accuracy(&cm) - 0.75).abs() < 1e-12);
        let stats = precision_recall_by_class(&cm);
        assert!((stats[0].precision - 1.0).abs() < 1e-12);
        assert!((stats[0].recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats[1].precision - 0.5).abs() < 1e-12);
        assert_eq!(stats[1].support, 1);
    }

    #[test]
    fn evaluate_maps_labels_and_skips_unknown() {
        let dataset = Dataset::new(vec![
            Sample {
                features: vec![1.0],
                label: 10,
            },
            Sample {
                features: vec![-1.0],
                label: 20,
            },
            Sample {
                features: vec![0.0],
                label: 30,
            },
        ]);
        let evaluation = evaluate(&[10, 20], &dataset, |features| {
            Some(if features[0] > 0.0 { 10 } else { 20 })
        });
        assert_eq!(evaluation.skipped, 1);
        assert!((evaluation.accuracy - 1.0).abs() < 1e-12);
        assert_eq!(evaluation.per_class[1].label, 20);
        assert!((evaluation.per_class[0].f1() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(2, 0);
        assert_eq!(accuracy(&cm), 0.0);
    }
}
