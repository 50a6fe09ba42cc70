use crate::textbook::SectionId;
use std::collections::HashMap;

/// Similarity scores keyed by unordered section pairs.
///
/// Pairs are stored under a canonical `(smaller, larger)` key, so
/// `get(a, b) == get(b, a)`. The matrix only grows; recomputing a pair
/// overwrites its score.
#[derive(Debug, Clone, Default)]
pub struct ScoreMatrix {
    scores: HashMap<(SectionId, SectionId), f64>,
}

fn canonical(a: SectionId, b: SectionId) -> (SectionId, SectionId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ScoreMatrix {
    /// Creates an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the score of a pair, returning the previous score.
    pub fn insert(&mut self, a: SectionId, b: SectionId, score: f64) -> Option<f64> {
        self.scores.insert(canonical(a, b), score)
    }

    /// Score of a pair, if computed.
    pub fn get(&self, a: SectionId, b: SectionId) -> Option<f64> {
        self.scores.get(&canonical(a, b)).copied()
    }

    /// Every computed score involving `section`, as `(other, score)`.
    pub fn scores_for(&self, section: SectionId) -> Vec<(SectionId, f64)> {
        let mut scores: Vec<(SectionId, f64)> = self
            .scores
            .iter()
            .filter_map(|(&(a, b), &score)| {
                if a == section {
                    Some((b, score))
                } else if b == section {
                    Some((a, score))
                } else {
                    None
                }
            })
            .collect();
        scores.sort_by_key(|&(id, _)| id);
        scores
    }

    /// Number of scored pairs.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` if nothing has been scored.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
