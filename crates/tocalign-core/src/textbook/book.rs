use super::section::{Concept, Section, SectionId, TextbookId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

fn default_valid() -> bool {
    true
}

/// Serialized form of a section tree, as produced by a document loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSource {
    /// Title text
    pub header: String,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Explicit stable key; the outline number is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Named concepts, keyed by concept id
    #[serde(default)]
    pub concepts: BTreeMap<String, Concept>,
    /// Validity flag
    #[serde(default = "default_valid")]
    pub valid: bool,
    /// Child sections in document order
    #[serde(default)]
    pub subsections: Vec<SectionSource>,
}

impl SectionSource {
    /// Creates a leaf section source.
    pub fn new(header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            content: content.into(),
            key: None,
            concepts: BTreeMap::new(),
            valid: true,
            subsections: Vec::new(),
        }
    }

    /// Sets the child sections.
    pub fn with_subsections(mut self, subsections: Vec<SectionSource>) -> Self {
        self.subsections = subsections;
        self
    }

    /// Sets an explicit key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Adds a concept keyed by its name.
    pub fn with_concept(mut self, concept: Concept) -> Self {
        self.concepts.insert(concept.name.clone(), concept);
        self
    }
}

/// Serialized form of a textbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextbookSource {
    /// Textbook name
    pub name: String,
    /// Top-level sections in document order
    #[serde(default)]
    pub sections: Vec<SectionSource>,
}

impl TextbookSource {
    /// Creates a textbook source from its top-level sections.
    pub fn new(name: impl Into<String>, sections: Vec<SectionSource>) -> Self {
        Self {
            name: name.into(),
            sections,
        }
    }
}

/// A document composed of a tree of sections.
///
/// The textbook owns every section in an arena laid out in document order
/// (pre-order), so [`all_subsections`](Self::all_subsections) is the arena
/// itself and is stable across calls. Sections point back to the textbook by
/// [`TextbookId`] and to their parent by [`SectionId`]. Building twice from
/// the same source yields fresh identities.
#[derive(Debug)]
pub struct Textbook {
    id: TextbookId,
    name: String,
    sections: Vec<Section>,
    roots: Vec<SectionId>,
    index: HashMap<SectionId, usize>,
    keys: HashMap<String, SectionId>,
}

impl Textbook {
    /// Builds a textbook from its serialized tree, assigning fresh section IDs.
    pub fn from_source(source: TextbookSource) -> Self {
        let mut textbook = Self {
            id: TextbookId::new(),
            name: source.name,
            sections: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
            keys: HashMap::new(),
        };

        for (i, section) in source.sections.into_iter().enumerate() {
            let id = textbook.insert(section, None, (i + 1).to_string());
            textbook.roots.push(id);
        }
        textbook
    }

    /// Creates a textbook with no sections.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_source(TextbookSource::new(name, Vec::new()))
    }

    fn insert(
        &mut self,
        source: SectionSource,
        parent: Option<SectionId>,
        outline: String,
    ) -> SectionId {
        let id = SectionId::new();
        let key = source.key.unwrap_or_else(|| outline.clone());
        let position = self.sections.len();

        // Reserve the slot first so the arena stays in pre-order.
        self.sections.push(Section {
            id,
            key: key.clone(),
            header: source.header,
            content: source.content,
            subsections: Vec::new(),
            parent,
            textbook: self.id,
            concepts: source.concepts,
            valid: source.valid,
        });
        self.index.insert(id, position);
        if self.keys.insert(key.clone(), id).is_some() {
            warn!(textbook = %self.name, key = %key, "Duplicate section key, later section wins");
        }

        let children: Vec<SectionId> = source
            .subsections
            .into_iter()
            .enumerate()
            .map(|(i, child)| self.insert(child, Some(id), format!("{}.{}", outline, i + 1)))
            .collect();
        self.sections[position].subsections = children;
        id
    }

    /// Identity of this textbook.
    pub fn id(&self) -> TextbookId {
        self.id
    }

    /// Textbook name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level section IDs in document order.
    pub fn subsections(&self) -> &[SectionId] {
        &self.roots
    }

    /// Every section in document order (parent before children).
    pub fn all_subsections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections in the textbook.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if the textbook has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Looks up a section by ID.
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.index.get(&id).map(|&i| &self.sections[i])
    }

    /// Looks up a section by its stable key.
    pub fn section_by_key(&self, key: &str) -> Option<&Section> {
        self.keys.get(key).and_then(|&id| self.section(id))
    }

    /// Returns the top-level ancestor of a section (the section itself if it
    /// is top-level). Its header is the section's topic.
    pub fn find_ancestor(&self, id: SectionId) -> Option<&Section> {
        let mut current = self.section(id)?;
        while let Some(parent) = current.parent {
            current = self.section(parent)?;
        }
        Some(current)
    }

    /// Nesting depth, 0 for top-level sections.
    pub fn depth(&self, id: SectionId) -> Option<usize> {
        let mut current = self.section(id)?;
        let mut depth = 0;
        while let Some(parent) = current.parent {
            current = self.section(parent)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Formats the table-of-contents line for a section.
    pub fn print_entry(&self, id: SectionId, indent: &str) -> Option<String> {
        self.section(id)
            .map(|s| format!("{}{} {}", indent, s.key, s.header))
    }

    /// Sets the validity flag. Returns `false` if the section is not in this textbook.
    pub fn set_valid(&mut self, id: SectionId, valid: bool) -> bool {
        match self.index.get(&id) {
            Some(&i) => {
                self.sections[i].valid = valid;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Textbook {
        Textbook::from_source(TextbookSource::new(
            "Physics",
            vec![
                SectionSource::new("Mechanics", "forces").with_subsections(vec![
                    SectionSource::new("Newton", "laws of motion"),
                    SectionSource::new("Energy", "work and energy")
                        .with_subsections(vec![SectionSource::new("Power", "rate of work")]),
                ]),
                SectionSource::new("Optics", "light").with_key("opt"),
            ],
        ))
    }

    #[test]
    fn test_all_subsections_in_document_order() {
        let book = sample();
        let headers: Vec<&str> = book.all_subsections().iter().map(|s| s.header()).collect();
        assert_eq!(headers, vec!["Mechanics", "Newton", "Energy", "Power", "Optics"]);
    }

    #[test]
    fn test_all_subsections_stable() {
        let book = sample();
        let first: Vec<SectionId> = book.all_subsections().iter().map(|s| s.id()).collect();
        let second: Vec<SectionId> = book.all_subsections().iter().map(|s| s.id()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_outline_keys_and_explicit_keys() {
        let book = sample();
        assert_eq!(book.section_by_key("1.2.1").unwrap().header(), "Power");
        assert_eq!(book.section_by_key("opt").unwrap().header(), "Optics");
        assert!(book.section_by_key("2").is_none());
    }

    #[test]
    fn test_find_ancestor_and_depth() {
        let book = sample();
        let power = book.section_by_key("1.2.1").unwrap().id();
        assert_eq!(book.find_ancestor(power).unwrap().header(), "Mechanics");
        assert_eq!(book.depth(power), Some(2));

        let optics = book.section_by_key("opt").unwrap().id();
        assert_eq!(book.find_ancestor(optics).unwrap().id(), optics);
        assert_eq!(book.depth(optics), Some(0));
    }

    #[test]
    fn test_back_references() {
        let book = sample();
        for section in book.all_subsections() {
            assert_eq!(section.textbook(), book.id());
            for child in section.subsections() {
                assert_eq!(book.section(*child).unwrap().parent(), Some(section.id()));
            }
        }
    }

    #[test]
    fn test_identical_text_is_distinct() {
        let book = Textbook::from_source(TextbookSource::new(
            "Twins",
            vec![SectionSource::new("Same", "text"), SectionSource::new("Same", "text")],
        ));
        let ids: Vec<SectionId> = book.all_subsections().iter().map(|s| s.id()).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_same_source_gets_fresh_identities() {
        let source = TextbookSource::new(
            "Physics",
            vec![SectionSource::new("Mechanics", "forces")
                .with_subsections(vec![SectionSource::new("Newton", "laws of motion")])],
        );
        let first = Textbook::from_source(source.clone());
        let second = Textbook::from_source(source);
        assert_ne!(first.id(), second.id());

        for (a, b) in first.all_subsections().iter().zip(second.all_subsections()) {
            assert_eq!(a.key(), b.key());
            assert_ne!(a.id(), b.id());
            assert!(first.section(b.id()).is_none());
        }
    }

    #[test]
    fn test_print_entry() {
        let book = sample();
        let newton = book.section_by_key("1.1").unwrap().id();
        assert_eq!(book.print_entry(newton, "\t").unwrap(), "\t1.1 Newton");
    }

    #[test]
    fn test_set_valid() {
        let mut book = sample();
        let newton = book.section_by_key("1.1").unwrap().id();
        assert!(book.section(newton).unwrap().is_valid());
        assert!(book.set_valid(newton, false));
        assert!(!book.section(newton).unwrap().is_valid());
        assert!(!book.set_valid(SectionId::from_u64(u64::MAX), false));
    }

    #[test]
    fn test_source_deserialize_defaults() {
        let source: TextbookSource = serde_json::from_str(
            r#"{"name": "T", "sections": [{"header": "A", "subsections": [{"header": "A1"}]}]}"#,
        )
        .unwrap();
        let book = Textbook::from_source(source);
        assert_eq!(book.len(), 2);
        assert!(book.all_subsections().iter().all(|s| s.is_valid()));
        assert_eq!(book.all_subsections()[1].content(), "");
    }
}
