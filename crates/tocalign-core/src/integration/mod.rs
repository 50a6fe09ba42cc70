//! Section matching and the integration store.
//!
//! A [`TextbookIntegration`] session aligns the sections of one or more
//! *other* textbooks with the sections of a *base* textbook:
//!
//! 1. Vectors for the whole corpus are added with
//!    [`add_section_vectors`](TextbookIntegration::add_section_vectors).
//! 2. A pass scores every other-section against every base section and files
//!    it under its best base section, or under [`MatchTarget::Unmatched`] if
//!    the best score is below the pass threshold.
//! 3. Later passes overwrite earlier assignments for the sections they visit.
//!
//! Passes run either in batch (document order, deterministic) or
//! iteratively (seeded shuffle, one section per step).

mod dataset;
mod mapping;
mod scores;
mod session;

pub use dataset::DatasetRecord;
pub use mapping::{IntegrationMapping, MatchTarget};
pub use scores::ScoreMatrix;
pub use session::{Assignment, BestMatch, IterativeIntegration, TextbookIntegration};
