//! Binary classification metrics.

use crate::error::{LoanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts of predicted against actual classes, with class `1` as positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

/// Metrics for evaluating a binary classifier on held-out rows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    /// Compare predictions with ground truth.
    ///
    /// Precision, recall and F1 are `0.0` when their denominator is zero.
    ///
    /// # Errors
    ///
    /// Fails if the slices differ in length or are empty.
    pub fn compute(y_true: &[u8], y_pred: &[u8]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(LoanError::InvalidParameter(format!(
                "y_true has {} entries but y_pred has {}",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(LoanError::EmptyData(
                "Cannot compute metrics without predictions".to_string(),
            ));
        }

        let mut confusion = ConfusionMatrix::default();
        for (&target, &pred) in y_true.iter().zip(y_pred) {
            match (pred == 1, target == 1) {
                (true, true) => confusion.true_positives += 1,
                (false, false) => confusion.true_negatives += 1,
                (true, false) => confusion.false_positives += 1,
                (false, true) => confusion.false_negatives += 1,
            }
        }

        let tp = confusion.true_positives as f64;
        let accuracy = (confusion.true_positives + confusion.true_negatives) as f64
            / y_true.len() as f64;
        let precision = ratio(tp, tp + confusion.false_positives as f64);
        let recall = ratio(tp, tp + confusion.false_negatives as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);

        Ok(Self {
            accuracy,
            precision,
            recall,
            f1,
            confusion,
        })
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

impl fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accuracy {:.1}%, precision {:.1}%, recall {:.1}%, f1 {:.3}",
            self.accuracy * 100.0,
            self.precision * 100.0,
            self.recall * 100.0,
            self.f1
        )
    }
}
