//! Two-pass TF-IDF + embedding integration.
//!
//! The lexical pass runs first with a strict threshold and keeps only
//! confident matches. The embedding pass then revisits every section on the
//! same session with a looser threshold; its dense vectors replace the sparse
//! ones and its assignments replace the lexical ones.
//!
//! ```ignore
//! let config = PipelineConfig::default();
//! let session = tfidf_embedding_integration(&base, &others, &config, config.embedder()?)?;
//! print!("{}", session.render_matches());
//! ```

use crate::config::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_LOWER_THRESHOLD, DEFAULT_SEED, DEFAULT_UPPER_THRESHOLD,
};
use crate::error::{EmbeddingError, IntegrationError, PipelineError};
use crate::integration::{Assignment, TextbookIntegration};
use crate::scoring::{CosineSimilarity, Similarity};
use crate::textbook::Textbook;
use crate::vectors::{
    extract, Embedder, EmbeddingVectorizer, HashingEmbedder, TextExtractor, TfIdfVectorizer,
    VectorProvider,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Settings of the two-pass pipeline.
///
/// Every field has a default, so a JSON file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Text extractors of the TF-IDF pass, by name
    pub tfidf_extractors: Vec<String>,
    /// One weight per TF-IDF extractor (all 1.0 when absent)
    pub tfidf_weights: Option<Vec<f64>>,
    /// Text extractor of the embedding pass, by name
    pub embedding_extractor: String,
    /// Threshold of the TF-IDF pass
    pub upper_threshold: f64,
    /// Threshold of the embedding pass
    pub lower_threshold: f64,
    /// Shuffle seed for iterative passes
    pub seed: u64,
    /// Visit sections in shuffled order, one at a time
    pub iterative: bool,
    /// Dimension of the built-in hashing embedder
    pub embedding_dim: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tfidf_extractors: vec!["header".to_string(), "content".to_string()],
            tfidf_weights: None,
            embedding_extractor: "header_and_content".to_string(),
            upper_threshold: DEFAULT_UPPER_THRESHOLD,
            lower_threshold: DEFAULT_LOWER_THRESHOLD,
            seed: DEFAULT_SEED,
            iterative: false,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

fn extractor(name: &str) -> Result<TextExtractor, PipelineError> {
    extract::by_name(name)
        .ok_or_else(|| PipelineError::InvalidConfig(format!("unknown text extractor '{}'", name)))
}

impl PipelineConfig {
    /// Builds the TF-IDF vectorizer described by this config.
    pub fn tfidf(&self) -> Result<TfIdfVectorizer, PipelineError> {
        let extractors = self
            .tfidf_extractors
            .iter()
            .map(|name| extractor(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TfIdfVectorizer::new(extractors, self.tfidf_weights.clone())?)
    }

    /// Builds the model-free embedder described by this config.
    pub fn embedder(&self) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        Ok(Arc::new(HashingEmbedder::new(self.embedding_dim)?))
    }

    /// Number of integration steps one pass takes over `others`.
    pub fn steps_per_pass(others: &[Textbook]) -> usize {
        others.iter().map(Textbook::len).sum()
    }
}

fn run_pass(
    session: &mut TextbookIntegration<'_>,
    scoring: &dyn Similarity,
    threshold: f64,
    iterative: bool,
    on_step: &mut dyn FnMut(&Assignment),
) -> Result<(), IntegrationError> {
    if iterative {
        for step in session.integrate_sections_iter(scoring, threshold) {
            on_step(&step?);
        }
        Ok(())
    } else {
        session.integrate_sections(scoring, threshold)
    }
}

/// Runs both passes and returns the session.
pub fn tfidf_embedding_integration<'t>(
    base: &'t Textbook,
    others: &'t [Textbook],
    config: &PipelineConfig,
    embedder: Arc<dyn Embedder>,
) -> Result<TextbookIntegration<'t>, PipelineError> {
    tfidf_embedding_integration_with_progress(base, others, config, embedder, |_| {})
}

/// Like [`tfidf_embedding_integration`], calling `on_step` after every
/// iterative step. Batch passes do not report steps.
#[instrument(
    skip_all,
    fields(base = base.name(), others = others.len(), iterative = config.iterative)
)]
pub fn tfidf_embedding_integration_with_progress<'t>(
    base: &'t Textbook,
    others: &'t [Textbook],
    config: &PipelineConfig,
    embedder: Arc<dyn Embedder>,
    mut on_step: impl FnMut(&Assignment),
) -> Result<TextbookIntegration<'t>, PipelineError> {
    let tfidf = config.tfidf()?;
    let embedding = EmbeddingVectorizer::new(embedder, extractor(&config.embedding_extractor)?);

    let mut session = TextbookIntegration::with_seed(base, others, config.seed);
    let corpus = session.corpus();

    session.add_section_vectors(tfidf.vectorize(&corpus)?);
    run_pass(
        &mut session,
        &CosineSimilarity,
        config.upper_threshold,
        config.iterative,
        &mut on_step,
    )?;
    info!(
        unmatched = session.mapping().unmatched_count(),
        "TF-IDF pass done"
    );

    session.add_section_vectors(embedding.vectorize(&corpus)?);
    run_pass(
        &mut session,
        &CosineSimilarity,
        config.lower_threshold,
        config.iterative,
        &mut on_step,
    )?;
    info!(
        unmatched = session.mapping().unmatched_count(),
        "Embedding pass done"
    );

    Ok(session)
}
