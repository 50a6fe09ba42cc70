//! Batch TF-IDF vectorization.
//!
//! # Algorithm
//!
//! For each configured text extractor the whole corpus is vectorized at once:
//!
//! ```text
//! tf(t, d)  = raw count of token t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1      (smoothed)
//! v(d)      = l2_normalize(tf * idf) * weight
//! ```
//!
//! Term and document counts come from `tf_idf_vectorizer::TokenFrequency`;
//! the weighting above is applied on top of them. Each extractor has its own
//! vocabulary; the vocabularies are laid side by side in one sparse index
//! space, so a combined vector is the weighted concatenation of the
//! per-extractor vectors.

use super::extract::TextExtractor;
use super::{tokenize, SparseVector, Vector, VectorMap, VectorProvider};
use crate::error::VectorizeError;
use crate::textbook::Section;
use std::collections::HashMap;
use std::fmt;
use tf_idf_vectorizer::TokenFrequency;
use tracing::{debug, instrument};

/// TF-IDF provider over one or more weighted text extractors.
#[derive(Clone)]
pub struct TfIdfVectorizer {
    extractors: Vec<(TextExtractor, f64)>,
}

impl fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("weights", &self.weights())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Creates a vectorizer.
    ///
    /// `weights` defaults to 1.0 per extractor.
    ///
    /// # Errors
    ///
    /// Returns `VectorizeError::InvalidConfig` if no extractor is given or if
    /// the number of weights differs from the number of extractors.
    pub fn new(
        extractors: Vec<TextExtractor>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, VectorizeError> {
        if extractors.is_empty() {
            return Err(VectorizeError::InvalidConfig(
                "at least one text extractor is required".to_string(),
            ));
        }
        let weights = weights.unwrap_or_else(|| vec![1.0; extractors.len()]);
        if weights.len() != extractors.len() {
            return Err(VectorizeError::InvalidConfig(format!(
                "{} weights for {} extractors",
                weights.len(),
                extractors.len()
            )));
        }
        Ok(Self {
            extractors: extractors.into_iter().zip(weights).collect(),
        })
    }

    /// Per-extractor weights in configuration order.
    pub fn weights(&self) -> Vec<f64> {
        self.extractors.iter().map(|(_, w)| *w).collect()
    }
}

/// Result of fitting one extractor over the corpus.
struct FittedTerms {
    vocabulary: usize,
    rows: Vec<Vec<(u32, f64)>>,
}

fn fit(texts: &[String]) -> FittedTerms {
    let documents: Vec<TokenFrequency> = texts
        .iter()
        .map(|text| {
            let mut counts = TokenFrequency::new();
            counts.add_tokens(&tokenize(text));
            counts
        })
        .collect();

    // Each document contributes its distinct terms once.
    let mut document_frequency = TokenFrequency::new();
    for counts in &documents {
        document_frequency.add_tokens(&counts.token_set_ref_str());
    }

    // Vocabulary indices follow sorted term order.
    let n = texts.len() as f64;
    let idf: HashMap<String, (u32, f64)> = document_frequency
        .sorted_dict_order_vector()
        .into_iter()
        .enumerate()
        .map(|(index, (term, df))| {
            let weight = ((1.0 + n) / (1.0 + f64::from(df))).ln() + 1.0;
            (term, (index as u32, weight))
        })
        .collect();

    let rows = documents
        .iter()
        .map(|counts| {
            counts
                .token_count_vector_ref_str()
                .into_iter()
                .filter_map(|(term, count)| {
                    idf.get(term)
                        .map(|&(index, weight)| (index, f64::from(count) * weight))
                })
                .collect()
        })
        .collect();

    FittedTerms {
        vocabulary: idf.len(),
        rows,
    }
}

impl VectorProvider for TfIdfVectorizer {
    #[instrument(skip_all, fields(corpus = corpus.len(), extractors = self.extractors.len()))]
    fn vectorize(&self, corpus: &[&Section]) -> Result<VectorMap, VectorizeError> {
        let mut pairs: Vec<Vec<(u32, f64)>> = vec![Vec::new(); corpus.len()];
        let mut offset: u32 = 0;

        for (extractor, weight) in &self.extractors {
            let texts: Vec<String> = corpus.iter().map(|&s| extractor(s)).collect();
            let fitted = fit(&texts);

            for (row, counts) in pairs.iter_mut().zip(fitted.rows) {
                let mut part = SparseVector::from_pairs(counts);
                let norm = part.norm();
                if norm > 0.0 {
                    part.scale(weight / norm);
                }
                row.extend(part.entries().iter().map(|&(i, w)| (i + offset, w)));
            }

            debug!(
                vocabulary = fitted.vocabulary,
                weight, "Fitted TF-IDF extractor"
            );
            offset += fitted.vocabulary as u32;
        }

        Ok(corpus
            .iter()
            .zip(pairs)
            .map(|(section, row)| (section.id(), Vector::Sparse(SparseVector::from_pairs(row))))
            .collect())
    }
}
