//! Pipeline execution with terminal progress.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tocalign_core::evaluation::{ExpertMappingProvider, IntegrationMetrics, JsonExpertMapping};
use tocalign_core::integration::TextbookIntegration;
use tocalign_core::pipeline::{tfidf_embedding_integration_with_progress, PipelineConfig};
use tocalign_core::textbook::Textbook;
use tracing::{debug, info};

/// Runs the two-pass pipeline.
///
/// Iterative runs show a progress bar over both passes when `show_progress`
/// is set.
pub fn run<'t>(
    base: &'t Textbook,
    others: &'t [Textbook],
    config: &PipelineConfig,
    show_progress: bool,
) -> Result<TextbookIntegration<'t>> {
    debug!(?config, "Pipeline configuration");
    let embedder = config
        .embedder()
        .context("Failed to create embedder")?;

    let pb = if config.iterative && show_progress {
        let pb = ProgressBar::new(2 * PipelineConfig::steps_per_pass(others) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message("Sections");
        pb
    } else {
        ProgressBar::hidden()
    };

    let session = tfidf_embedding_integration_with_progress(base, others, config, embedder, |_| {
        pb.inc(1)
    })
    .context("Integration failed")?;
    pb.finish_and_clear();

    info!(
        matched = session.mapping().len() - session.mapping().unmatched_count(),
        unmatched = session.mapping().unmatched_count(),
        "Integration finished"
    );
    Ok(session)
}

/// Loads an expert mapping and scores the session against it.
pub fn evaluate(session: &TextbookIntegration<'_>, path: &Path) -> Result<IntegrationMetrics> {
    let others = session.other_textbooks();
    let other = others
        .first()
        .context("Evaluation needs one other textbook")?;

    let expert = JsonExpertMapping::load(path)
        .and_then(|provider| provider.expert_mapping(session.base_textbook(), other))
        .with_context(|| format!("Failed to load expert mapping {}", path.display()))?;

    session.evaluate(&expert).context("Evaluation failed")
}
