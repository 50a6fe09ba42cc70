//! Section vectors and the providers that compute them.
//!
//! Vectorization is a collaborator of the matcher: a [`VectorProvider`] turns
//! a corpus of sections into a [`VectorMap`], which the integration session
//! merges into its own map before a pass.
//!
//! ## Providers
//!
//! - [`TfIdfVectorizer`] - batch TF-IDF over one or more weighted text extractors (sparse)
//! - [`EmbeddingVectorizer`] - one text extractor + an [`Embedder`] (dense)
//! - [`HashingEmbedder`] - deterministic model-free embedder

mod embedding;
pub mod extract;
mod tfidf;

pub use embedding::{Embedder, EmbeddingVectorizer, HashingEmbedder};
pub use extract::TextExtractor;
pub use tfidf::TfIdfVectorizer;

use crate::config::MIN_TOKEN_LEN;
use crate::error::{ScoringError, VectorizeError};
use crate::textbook::{Section, SectionId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Vectors keyed by section identity, accumulated across vectorization runs.
pub type VectorMap = HashMap<SectionId, Vector>;

/// Computes vectors for a corpus of sections.
pub trait VectorProvider {
    /// Returns one vector per corpus section.
    fn vectorize(&self, corpus: &[&Section]) -> Result<VectorMap, VectorizeError>;
}

/// Sparse weighted-term vector with entries sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Builds a sparse vector from `(index, weight)` pairs.
    ///
    /// Pairs may come in any order; repeated indices are summed and zero
    /// weights are dropped.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut entries: Vec<(u32, f64)> = pairs.into_iter().collect();
        entries.sort_by_key(|&(i, _)| i);

        let mut merged: Vec<(u32, f64)> = Vec::with_capacity(entries.len());
        for (index, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == index => last.1 += weight,
                _ => merged.push((index, weight)),
            }
        }
        merged.retain(|&(_, w)| w != 0.0);
        Self { entries: merged }
    }

    /// Non-zero entries in index order.
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Multiplies every weight by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for (_, w) in &mut self.entries {
            *w *= factor;
        }
    }
}

/// Opaque per-section representation for one vectorization pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    /// Weighted terms (TF-IDF)
    Sparse(SparseVector),
    /// Dense numeric embedding
    Dense(Vec<f32>),
}

impl Vector {
    /// Cosine similarity between two vectors of the same kind.
    ///
    /// Returns 0.0 when either vector has zero magnitude.
    pub fn cosine(&self, other: &Vector) -> Result<f64, ScoringError> {
        match (self, other) {
            (Vector::Sparse(a), Vector::Sparse(b)) => Ok(ratio(a.dot(b), a.norm(), b.norm())),
            (Vector::Dense(a), Vector::Dense(b)) => dense_cosine(a, b),
            _ => Err(ScoringError::IncompatibleVectors),
        }
    }
}

/// Cosine similarity for dense slices.
pub fn dense_cosine(a: &[f32], b: &[f32]) -> Result<f64, ScoringError> {
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum();
    let mag_a = a.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|&y| (y as f64) * (y as f64)).sum::<f64>().sqrt();
    Ok(ratio(dot, mag_a, mag_b))
}

fn ratio(dot: f64, mag_a: f64, mag_b: f64) -> f64 {
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?u)\b\w\w+\b").unwrap_or_else(|e| panic!("invalid token pattern: {e}"))
});

/// Lower-cases `text` and splits it into word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}
