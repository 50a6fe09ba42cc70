use super::expert::ExpertMapping;
use crate::error::IntegrationError;
use crate::integration::{IntegrationMapping, MatchTarget, TextbookIntegration};
use crate::textbook::SectionId;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

/// Agreement between an algorithm mapping and an expert mapping.
///
/// Ratios whose denominator is zero are `None` (serialized as `null`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegrationMetrics {
    /// Pairs both the expert and the algorithm put under the same base section
    pub true_positives: usize,
    /// Pairs only the algorithm produced
    pub false_positives: usize,
    /// Pairs only the expert listed
    pub false_negatives: usize,
    /// tp / (tp + fp)
    pub precision: Option<f64>,
    /// tp / (tp + fn)
    pub recall: Option<f64>,
    /// Harmonic mean of precision and recall, defined only when tp > 0
    pub f1: Option<f64>,
    /// |E ∩ A| / |E ∪ A| over all `(target, section)` pairs, unmatched included
    pub jaccard_index: Option<f64>,
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Compares `algorithm` with `expert` over the given base sections.
///
/// True/false positives and false negatives are counted per base section;
/// the unmatched sets only contribute to the Jaccard index.
pub fn evaluate_mapping(
    base_sections: impl IntoIterator<Item = SectionId>,
    algorithm: &IntegrationMapping,
    expert: &ExpertMapping,
) -> IntegrationMetrics {
    let empty = BTreeSet::new();
    let mut true_positives = 0;
    let mut false_positives = 0;
    let mut false_negatives = 0;

    for base in base_sections {
        let target = MatchTarget::Base(base);
        let expected = expert.get(&target).unwrap_or(&empty);
        let actual = algorithm.sections(&target).unwrap_or(&empty);

        true_positives += expected.intersection(actual).count();
        false_positives += actual.difference(expected).count();
        false_negatives += expected.difference(actual).count();
    }

    let precision = ratio(true_positives, true_positives + false_positives);
    let recall = ratio(true_positives, true_positives + false_negatives);
    let f1 = match (precision, recall) {
        (Some(p), Some(r)) if true_positives > 0 => Some(2.0 / (1.0 / p + 1.0 / r)),
        _ => None,
    };

    let expert_pairs = expert.pairs();
    let algorithm_pairs = algorithm.pairs();
    let jaccard_index = ratio(
        expert_pairs.intersection(&algorithm_pairs).count(),
        expert_pairs.union(&algorithm_pairs).count(),
    );

    IntegrationMetrics {
        true_positives,
        false_positives,
        false_negatives,
        precision,
        recall,
        f1,
        jaccard_index,
    }
}

impl TextbookIntegration<'_> {
    /// Evaluates the current mapping against an expert mapping.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::InvalidArgument` unless the session has
    /// exactly one other textbook.
    pub fn evaluate(&self, expert: &ExpertMapping) -> Result<IntegrationMetrics, IntegrationError> {
        let others = self.other_textbooks().len();
        if others != 1 {
            return Err(IntegrationError::InvalidArgument(format!(
                "evaluation needs exactly one other textbook, got {}",
                others
            )));
        }

        let base_ids = self.base_textbook().all_subsections().iter().map(|s| s.id());
        let metrics = evaluate_mapping(base_ids, self.mapping(), expert);
        info!(
            tp = metrics.true_positives,
            fp = metrics.false_positives,
            fn_ = metrics.false_negatives,
            "Evaluated integration: F1 {:?}, Jaccard {:?}",
            metrics.f1,
            metrics.jaccard_index
        );
        Ok(metrics)
    }
}
