//! Text extraction functions that choose which part of a section is vectorized.

use crate::textbook::Section;
use std::sync::Arc;

/// Maps a section to the text a vectorizer should see.
pub type TextExtractor = Arc<dyn Fn(&Section) -> String + Send + Sync>;

/// Section title only.
pub fn header() -> TextExtractor {
    Arc::new(|s: &Section| s.header().to_string())
}

/// Section body only.
pub fn content() -> TextExtractor {
    Arc::new(|s: &Section| s.content().to_string())
}

/// Title followed by body.
pub fn header_and_content() -> TextExtractor {
    Arc::new(|s: &Section| format!("{} {}", s.header(), s.content()))
}

/// Concept names joined by spaces.
pub fn concepts() -> TextExtractor {
    Arc::new(|s: &Section| s.concept_names().join(" "))
}

/// Resolves a built-in extractor by name (`header`, `content`,
/// `header_and_content`, `concepts`).
pub fn by_name(name: &str) -> Option<TextExtractor> {
    match name {
        "header" => Some(header()),
        "content" => Some(content()),
        "header_and_content" => Some(header_and_content()),
        "concepts" => Some(concepts()),
        _ => None,
    }
}
