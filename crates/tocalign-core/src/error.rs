//! Error types for tocalign-core.
//!
//! This module defines error types that are used across the core library,
//! including scoring, integration, vectorization, loading and export errors.

use crate::textbook::SectionId;
use thiserror::Error;

/// Errors that can occur while scoring a pair of sections.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A vector map was supplied but has no entry for this section
    #[error("No vector computed for section {0}")]
    MissingVector(SectionId),
    /// Dense vectors of different length (expected vs actual)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the first vector
        expected: usize,
        /// Dimension of the second vector
        actual: usize,
    },
    /// A sparse vector was compared against a dense one
    #[error("Cannot compare sparse and dense vectors")]
    IncompatibleVectors,
}

/// Errors that can occur during section integration and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// Caller passed arguments the operation does not support
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Scoring function failed (fatal for the running pass)
    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoringError),
    /// Section does not belong to any textbook in the session
    #[error("Unknown section: {0}")]
    UnknownSection(SectionId),
}

/// Errors that can occur during embedding operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    /// Invalid embedder configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Embedding a text failed
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    /// Embedder produced a vector of the wrong length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension advertised by the embedder
        expected: usize,
        /// Dimension actually produced
        actual: usize,
    },
}

/// Errors that can occur while computing section vectors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorizeError {
    /// Invalid vectorizer configuration
    #[error("Invalid vectorizer config: {0}")]
    InvalidConfig(String),
    /// Underlying embedder failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Errors that can occur while loading textbooks or expert mappings.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a source file
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that could not be read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Source file is not valid JSON for the expected shape
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Path that could not be parsed
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
    /// A section key does not resolve to a section
    #[error("Unknown section key '{key}' in textbook '{textbook}'")]
    UnknownSection {
        /// Textbook that was searched
        textbook: String,
        /// Key that failed to resolve
        key: String,
    },
    /// The loader was given no textbooks
    #[error("No textbooks to load")]
    NoTextbooks,
}

/// Errors that can occur while exporting records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to write output
    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
    /// Record could not be serialized
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur while computing classification metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// True and predicted label sequences differ in length
    #[error("Label length mismatch: {expected} true labels, {actual} predictions")]
    LengthMismatch {
        /// Number of true labels
        expected: usize,
        /// Number of predicted labels
        actual: usize,
    },
}

/// Errors that can occur while running the two-pass pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Pipeline configuration names something that does not exist
    #[error("Invalid pipeline config: {0}")]
    InvalidConfig(String),
    /// Computing vectors failed
    #[error(transparent)]
    Vectorize(#[from] VectorizeError),
    /// An integration pass failed
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    /// The embedder could not be created
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
