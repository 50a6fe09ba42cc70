//! Flattening textbooks into the corpus handed to vectorizers.

use crate::textbook::{Section, Textbook};

/// Returns every section of the base textbook followed by every section of
/// each other textbook, in textbook order then document order.
pub fn corpus<'a>(base: &'a Textbook, others: &'a [Textbook]) -> Vec<&'a Section> {
    base.all_subsections()
        .iter()
        .chain(others.iter().flat_map(|t| t.all_subsections().iter()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textbook::{SectionSource, TextbookSource};

    #[test]
    fn test_corpus_order() {
        let base = Textbook::from_source(TextbookSource::new(
            "Base",
            vec![SectionSource::new("A", "").with_subsections(vec![SectionSource::new("A1", "")])],
        ));
        let others = vec![
            Textbook::from_source(TextbookSource::new("X", vec![SectionSource::new("X1", "")])),
            Textbook::from_source(TextbookSource::new("Y", vec![SectionSource::new("Y1", "")])),
        ];

        let headers: Vec<&str> = corpus(&base, &others).iter().map(|s| s.header()).collect();
        assert_eq!(headers, vec!["A", "A1", "X1", "Y1"]);
    }

    #[test]
    fn test_corpus_empty() {
        let base = Textbook::empty("Base");
        assert!(corpus(&base, &[]).is_empty());
    }
}
