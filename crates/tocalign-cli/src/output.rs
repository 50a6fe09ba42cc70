//! Output formatting for integration results.
//!
//! Supports both the human-readable table-of-contents report and JSON for
//! scripting.

use serde::Serialize;
use tocalign_core::evaluation::IntegrationMetrics;
use tocalign_core::integration::TextbookIntegration;

/// JSON output structure for an integration
#[derive(Serialize)]
pub struct JsonOutput {
    pub base: String,
    pub others: Vec<String>,
    pub matches: Vec<JsonMatch>,
    pub unmatched_count: usize,
    pub metrics: Option<IntegrationMetrics>,
}

/// One other-textbook section and where it was filed
#[derive(Serialize)]
pub struct JsonMatch {
    /// Source textbook name
    pub textbook: String,
    pub key: String,
    pub header: String,
    /// Base section it was matched to, `null` when unmatched
    pub target: Option<JsonSection>,
}

/// Base section reference in JSON format
#[derive(Serialize)]
pub struct JsonSection {
    pub key: String,
    pub header: String,
}

/// Formats an integration as JSON.
pub fn format_json(
    session: &TextbookIntegration<'_>,
    metrics: Option<&IntegrationMetrics>,
) -> String {
    let base = session.base_textbook();
    let mapping = session.mapping();

    let matches = session
        .other_textbooks()
        .iter()
        .flat_map(|textbook| {
            textbook.all_subsections().iter().map(move |section| {
                let target = mapping
                    .target_of(section.id())
                    .and_then(|t| t.base())
                    .and_then(|id| base.section(id))
                    .map(|b| JsonSection {
                        key: b.key().to_string(),
                        header: b.header().to_string(),
                    });
                JsonMatch {
                    textbook: textbook.name().to_string(),
                    key: section.key().to_string(),
                    header: section.header().to_string(),
                    target,
                }
            })
        })
        .collect();

    let output = JsonOutput {
        base: base.name().to_string(),
        others: session
            .other_textbooks()
            .iter()
            .map(|t| t.name().to_string())
            .collect(),
        matches,
        unmatched_count: mapping.unmatched_count(),
        metrics: metrics.copied(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
}

/// Formats an integration for human-readable terminal output.
pub fn format_human(
    session: &TextbookIntegration<'_>,
    metrics: Option<&IntegrationMetrics>,
) -> String {
    let mut output = session.render_matches();

    if let Some(m) = metrics {
        output.push('\n');
        output.push_str(&format!(
            "Evaluation (tp {}, fp {}, fn {}):\n",
            m.true_positives, m.false_positives, m.false_negatives
        ));
        output.push_str(&format!("   Precision: {}\n", format_ratio(m.precision)));
        output.push_str(&format!("   Recall:    {}\n", format_ratio(m.recall)));
        output.push_str(&format!("   F1:        {}\n", format_ratio(m.f1)));
        output.push_str(&format!("   Jaccard:   {}\n", format_ratio(m.jaccard_index)));
    }

    output.trim_end().to_string()
}
