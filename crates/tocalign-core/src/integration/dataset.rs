use super::mapping::MatchTarget;
use super::session::TextbookIntegration;
use crate::textbook::{Section, Textbook};
use serde::{Deserialize, Serialize};

/// One labelled section, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Header of the top-level base section the record is filed under
    pub topic: String,
    /// Header of the section itself
    pub subtopic: String,
    /// Section body
    pub content: String,
    /// Concept names found in the section
    pub concepts: Vec<String>,
    /// Name of the textbook the section comes from
    pub textbook: String,
}

impl DatasetRecord {
    fn new(section: &Section, topic: &Section, textbook: &Textbook) -> Self {
        Self {
            topic: topic.header().to_string(),
            subtopic: section.header().to_string(),
            content: section.content().to_string(),
            concepts: section.concept_names(),
            textbook: textbook.name().to_string(),
        }
    }
}

pub(crate) fn build_dataset(session: &TextbookIntegration<'_>) -> Vec<DatasetRecord> {
    let base = session.base_textbook();
    let mut base_records = Vec::new();
    let mut other_records = Vec::new();

    for (target, matches) in session.mapping().iter() {
        let MatchTarget::Base(base_id) = *target else {
            continue;
        };
        let (Some(base_section), Some(topic)) = (base.section(base_id), base.find_ancestor(base_id))
        else {
            continue;
        };

        if base_section.is_valid() {
            base_records.push(DatasetRecord::new(base_section, topic, base));
        }

        for &other_id in matches {
            let Some(section) = session.find_section(other_id) else {
                continue;
            };
            let Some(textbook) = session.find_textbook(section.textbook()) else {
                continue;
            };
            if section.is_valid() {
                other_records.push(DatasetRecord::new(section, topic, textbook));
            }
        }
    }

    base_records.extend(other_records);
    base_records
}

#[cfg(test)]
mod tests {
    use crate::integration::TextbookIntegration;
    use crate::scoring::CosineSimilarity;
    use crate::test_utils::{dense_vectors, fixture_textbooks};

    #[test]
    fn test_dataset_labels_others_with_base_topic() {
        let (base, others) = fixture_textbooks();
        let mut session = TextbookIntegration::new(&base, &others);
        session.add_section_vectors(dense_vectors(&base, &others));
        session.integrate_sections(&CosineSimilarity, 0.5).unwrap();

        let records = session.dataset();
        let heat = records
            .iter()
            .find(|r| r.textbook == "Other" && r.subtopic == "Heat")
            .unwrap();
        assert_eq!(heat.topic, "Thermodynamics");
    }

    #[test]
    fn test_dataset_base_records_first() {
        let (base, others) = fixture_textbooks();
        let mut session = TextbookIntegration::new(&base, &others);
        session.add_section_vectors(dense_vectors(&base, &others));
        session.integrate_sections(&CosineSimilarity, 0.5).unwrap();

        let records = session.dataset();
        let first_other = records
            .iter()
            .position(|r| r.textbook != "Base")
            .unwrap();
        assert!(records[..first_other].iter().all(|r| r.textbook == "Base"));
        assert!(records[first_other..].iter().all(|r| r.textbook != "Base"));
    }

    #[test]
    fn test_dataset_skips_unmatched_and_invalid() {
        let (base, mut others) = fixture_textbooks();
        let invalid = others[0].section_by_key("1").unwrap().id();
        others[0].set_valid(invalid, false);

        let mut session = TextbookIntegration::new(&base, &others);
        session.add_section_vectors(dense_vectors(&base, &others));
        session.integrate_sections(&CosineSimilarity, 0.5).unwrap();

        let records = session.dataset();
        assert!(!records
            .iter()
            .any(|r| r.textbook == "Other" && r.subtopic == "Heat"));
        let unmatched = session.mapping().unmatched_count();
        let other_total: usize = others.iter().map(|t| t.len()).sum();
        let exported = records.iter().filter(|r| r.textbook != "Base").count();
        assert_eq!(exported, other_total - unmatched - 1);
    }

    #[test]
    fn test_dataset_empty_mapping() {
        let (base, others) = fixture_textbooks();
        let session = TextbookIntegration::new(&base, &others);
        assert!(session.dataset().is_empty());
    }
}
