//! Evaluation of integration results against expert ground truth.
//!
//! Two families of metrics live here:
//!
//! | Metric set | Input | Use |
//! |------------|-------|-----|
//! | [`IntegrationMetrics`] | algorithm vs expert mapping | section alignment quality |
//! | [`ClassificationMetrics`] | true vs predicted labels | derived topic label quality |
//!
//! Undefined values (a ratio with a zero denominator) are reported as `None`
//! for integration metrics and as NaN for classification metrics. Neither is
//! ever silently replaced with `0`.
//!
//! # Example
//!
//! ```ignore
//! use tocalign_core::evaluation::{ExpertMappingProvider, JsonExpertMapping};
//!
//! let expert = JsonExpertMapping::load("expert.json")?.expert_mapping(&base, &other)?;
//! let metrics = session.evaluate(&expert)?;
//! println!("F1: {:?}", metrics.f1);
//! ```

mod classification;
mod expert;
mod metrics;

pub use classification::{performance_metrics, ClassificationMetrics};
pub use expert::{ExpertMapping, ExpertMappingProvider, JsonExpertMapping};
pub use metrics::{evaluate_mapping, IntegrationMetrics};
