//! Default configuration constants.
//!
//! These values are used by the pipeline, the CLI and the benchmarks so that
//! all entry points agree on seeds and thresholds.
//!
//! # Usage
//!
//! ```
//! use tocalign_core::config::{DEFAULT_LOWER_THRESHOLD, DEFAULT_UPPER_THRESHOLD};
//!
//! assert!(DEFAULT_LOWER_THRESHOLD < DEFAULT_UPPER_THRESHOLD);
//! ```

// =============================================================================
// Matching
// =============================================================================

/// Seed for the shuffle used by iterative integration.
///
/// Every session seeds its own RNG with this value unless told otherwise, so
/// iterative runs over the same inputs visit sections in the same order.
pub const DEFAULT_SEED: u64 = 2024;

/// Threshold for the lexical (TF-IDF) pass.
///
/// The lexical pass only keeps confident matches; anything below is left for
/// the embedding pass to re-route.
pub const DEFAULT_UPPER_THRESHOLD: f64 = 0.6;

/// Threshold for the embedding pass.
pub const DEFAULT_LOWER_THRESHOLD: f64 = 0.4;

// =============================================================================
// Vectorization
// =============================================================================

/// Dimension of vectors produced by the built-in hashing embedder.
pub const DEFAULT_EMBEDDING_DIM: usize = 256;

/// Minimum token length kept by the tokenizer (`\b\w\w+\b`).
pub const MIN_TOKEN_LEN: usize = 2;

// =============================================================================
// Expert mappings
// =============================================================================

/// Reserved key in expert mapping files for sections with no counterpart.
pub const UNMATCHED_KEY: &str = "unmatched";
