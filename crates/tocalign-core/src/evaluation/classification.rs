use crate::error::MetricsError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Accuracy and macro-averaged precision, recall and F1 of a labelling.
///
/// Per-class values with a zero denominator are NaN and are left out of the
/// macro average. An average over nothing but NaN is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    /// Fraction of labels predicted exactly
    pub accuracy: f64,
    /// Macro-averaged precision
    pub precision: f64,
    /// Macro-averaged recall
    pub recall: f64,
    /// Macro-averaged F1
    pub f1: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct ClassCounts {
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
}

fn divide(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Scores predicted labels against true labels.
///
/// Labels are the sorted union of both sequences.
///
/// # Errors
///
/// Returns `MetricsError::LengthMismatch` if the sequences differ in length.
pub fn performance_metrics<L: Ord>(
    y_true: &[L],
    y_pred: &[L],
) -> Result<ClassificationMetrics, MetricsError> {
    if y_true.len() != y_pred.len() {
        return Err(MetricsError::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }

    let labels: BTreeSet<&L> = y_true.iter().chain(y_pred.iter()).collect();
    let counts: Vec<ClassCounts> = labels
        .iter()
        .map(|&label| {
            let mut counts = ClassCounts::default();
            for (t, p) in y_true.iter().zip(y_pred) {
                match (t == label, p == label) {
                    (true, true) => counts.true_positives += 1,
                    (false, true) => counts.false_positives += 1,
                    (true, false) => counts.false_negatives += 1,
                    (false, false) => {}
                }
            }
            counts
        })
        .collect();

    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();

    Ok(ClassificationMetrics {
        accuracy: divide(correct, y_true.len()),
        precision: nan_mean(
            counts
                .iter()
                .map(|c| divide(c.true_positives, c.true_positives + c.false_positives)),
        ),
        recall: nan_mean(
            counts
                .iter()
                .map(|c| divide(c.true_positives, c.true_positives + c.false_negatives)),
        ),
        f1: nan_mean(counts.iter().map(|c| {
            divide(
                2 * c.true_positives,
                2 * c.true_positives + c.false_positives + c.false_negatives,
            )
        })),
    })
}
