//! # tocalign Core
//!
//! Platform-independent library for aligning the tables of contents of
//! textbooks by section similarity.
//!
//! One *base* textbook is integrated with sections from one or more *other*
//! textbooks: every other-section is filed under its most similar base
//! section, or left unmatched when nothing is similar enough. Matching runs in
//! passes (typically a strict TF-IDF pass followed by a looser embedding pass)
//! against a shared session, and the result can be evaluated against an
//! expert mapping, printed as a report or exported as a labelled dataset.
//!
//! ## Modules
//!
//! - [`textbook`] - Section trees, identities and document loaders
//! - [`corpus`] - Flattened view of all sections in an integration
//! - [`vectors`] - TF-IDF and embedding vectorization providers
//! - [`scoring`] - Pluggable similarity functions and the scoring adapter
//! - [`integration`] - Matcher session, integration mapping and score matrix
//! - [`evaluation`] - Expert mappings, integration and classification metrics
//! - [`report`] - Plain-text integration report
//! - [`export`] - Newline-delimited JSON export
//! - [`pipeline`] - Two-pass TF-IDF + embedding integration
//! - [`config`] - Default seeds and thresholds
//! - [`error`] - Error types for every stage

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod integration;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod textbook;
pub mod vectors;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{
    EmbeddingError, ExportError, IntegrationError, LoadError, MetricsError, PipelineError,
    ScoringError, VectorizeError,
};
pub use integration::{IntegrationMapping, MatchTarget, TextbookIntegration};
pub use textbook::{Section, SectionId, Textbook, TextbookId};
