//! Pluggable similarity functions and the adapter the matcher scores through.
//!
//! A [`Similarity`] scores either raw sections or their precomputed vectors.
//! The [`ScoringAdapter`] decides which: when the session holds vectors it
//! scores the two sections' vectors, otherwise it hands the sections over
//! directly. This lets content-based and vector-based scoring functions be
//! swapped without touching the matcher.
//!
//! # Strategies
//!
//! | Strategy | Vectors | Raw sections |
//! |----------|---------|--------------|
//! | [`CosineSimilarity`] | scalar cosine | cosine over header + content term counts |
//! | [`PairwiseCosine`] | entry `[0][0]` of the batch matrix | batch matrix over term counts |

use crate::error::ScoringError;
use crate::textbook::Section;
use crate::vectors::{tokenize, SparseVector, Vector, VectorMap};
use std::collections::HashMap;

/// Input to a similarity function.
#[derive(Debug, Clone, Copy)]
pub enum Scored<'a> {
    /// Score the section's own text
    Section(&'a Section),
    /// Score a precomputed vector
    Vector(&'a Vector),
}

/// A similarity function over sections or vectors.
///
/// Scores are in whatever range the function produces; the matcher only
/// compares them with each other and with the pass threshold.
pub trait Similarity {
    /// Scores two inputs. Higher is more similar.
    fn similarity(&self, a: Scored<'_>, b: Scored<'_>) -> Result<f64, ScoringError>;
}

impl<F> Similarity for F
where
    F: Fn(Scored<'_>, Scored<'_>) -> Result<f64, ScoringError>,
{
    fn similarity(&self, a: Scored<'_>, b: Scored<'_>) -> Result<f64, ScoringError> {
        self(a, b)
    }
}

/// Routes a pair of sections to a similarity function, through their
/// vectors when any are available.
pub struct ScoringAdapter<'s> {
    function: &'s dyn Similarity,
}

impl<'s> ScoringAdapter<'s> {
    /// Wraps a similarity function.
    pub fn new(function: &'s dyn Similarity) -> Self {
        Self { function }
    }

    /// Scores `a` against `b`.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::MissingVector` if `vectors` is non-empty but has
    /// no entry for one of the sections, or any error the function raises.
    pub fn score(
        &self,
        a: &Section,
        b: &Section,
        vectors: &VectorMap,
    ) -> Result<f64, ScoringError> {
        if vectors.is_empty() {
            return self
                .function
                .similarity(Scored::Section(a), Scored::Section(b));
        }
        let va = vectors
            .get(&a.id())
            .ok_or(ScoringError::MissingVector(a.id()))?;
        let vb = vectors
            .get(&b.id())
            .ok_or(ScoringError::MissingVector(b.id()))?;
        self.function.similarity(Scored::Vector(va), Scored::Vector(vb))
    }
}

/// Term-count vector over header and content, used when no vectors exist.
fn term_counts(a: &Section, b: &Section) -> (Vector, Vector) {
    let mut vocabulary: HashMap<String, u32> = HashMap::new();
    let mut count = |section: &Section| {
        let text = format!("{} {}", section.header(), section.content());
        let pairs: Vec<(u32, f64)> = tokenize(&text)
            .into_iter()
            .map(|token| {
                let next = vocabulary.len() as u32;
                (*vocabulary.entry(token).or_insert(next), 1.0)
            })
            .collect();
        Vector::Sparse(SparseVector::from_pairs(pairs))
    };
    let va = count(a);
    let vb = count(b);
    (va, vb)
}

// A raw section and a vector live in different spaces.
fn resolve(a: Scored<'_>, b: Scored<'_>) -> Result<(Vector, Vector), ScoringError> {
    match (a, b) {
        (Scored::Vector(va), Scored::Vector(vb)) => Ok((va.clone(), vb.clone())),
        (Scored::Section(sa), Scored::Section(sb)) => Ok(term_counts(sa, sb)),
        _ => Err(ScoringError::IncompatibleVectors),
    }
}

/// Scalar cosine similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl Similarity for CosineSimilarity {
    fn similarity(&self, a: Scored<'_>, b: Scored<'_>) -> Result<f64, ScoringError> {
        match (a, b) {
            (Scored::Vector(va), Scored::Vector(vb)) => va.cosine(vb),
            _ => {
                let (va, vb) = resolve(a, b)?;
                va.cosine(&vb)
            }
        }
    }
}

/// Cosine similarity computed through the batch pairwise routine.
///
/// Each call evaluates the 1×1 matrix `[a] × [b]` with [`pairwise_cosine`]
/// and returns its only entry, so it agrees with [`CosineSimilarity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseCosine;

impl Similarity for PairwiseCosine {
    fn similarity(&self, a: Scored<'_>, b: Scored<'_>) -> Result<f64, ScoringError> {
        let (va, vb) = resolve(a, b)?;
        let matrix = pairwise_cosine(std::slice::from_ref(&va), std::slice::from_ref(&vb))?;
        Ok(matrix[0][0])
    }
}

/// Cosine similarity of every row of `rows_a` against every row of `rows_b`.
///
/// Returns a `rows_a.len() × rows_b.len()` matrix.
pub fn pairwise_cosine(
    rows_a: &[Vector],
    rows_b: &[Vector],
) -> Result<Vec<Vec<f64>>, ScoringError> {
    rows_a
        .iter()
        .map(|a| rows_b.iter().map(|b| a.cosine(b)).collect())
        .collect()
}
