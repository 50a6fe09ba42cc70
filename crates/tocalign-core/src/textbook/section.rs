use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique section IDs.
static SECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Global counter for generating unique textbook IDs.
static TEXTBOOK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique section identifier.
///
/// Sections are compared by identity, never by content: two sections with the
/// same header and body are different entities with different IDs. IDs are
/// generated atomically so textbooks can be loaded from several threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(u64);

impl SectionId {
    /// Generates a new unique section ID.
    ///
    /// Default is intentionally not implemented: two calls return different IDs.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(SECTION_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Creates a SectionId from a raw u64 value.
    ///
    /// Useful for testing. Be careful not to create duplicate IDs when using this method.
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value of this ID.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section#{}", self.0)
    }
}

/// Unique textbook identifier.
///
/// Sections refer back to their owning textbook through this ID rather than
/// through a pointer, so the textbook can own its sections outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextbookId(u64);

impl TextbookId {
    /// Generates a new unique textbook ID.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(TEXTBOOK_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Returns the raw u64 value of this ID.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A named concept found in a section's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Concept name as it appears in the text
    pub name: String,
    /// Number of occurrences in the section
    #[serde(default)]
    pub frequency: u32,
}

impl Concept {
    /// Creates a concept seen once.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frequency: 1,
        }
    }
}

/// A node in a textbook's content tree.
///
/// Sections are created once by [`Textbook::from_source`](super::Textbook::from_source)
/// and are immutable afterwards, except for the validity flag which is toggled
/// through the owning textbook.
#[derive(Debug, PartialEq)]
pub struct Section {
    pub(crate) id: SectionId,
    pub(crate) key: String,
    pub(crate) header: String,
    pub(crate) content: String,
    pub(crate) subsections: Vec<SectionId>,
    pub(crate) parent: Option<SectionId>,
    pub(crate) textbook: TextbookId,
    pub(crate) concepts: std::collections::BTreeMap<String, Concept>,
    pub(crate) valid: bool,
}

impl Section {
    /// Identity of this section.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Stable key within the textbook (explicit, or the outline number like `2.1`).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Title text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Body text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Direct children in document order.
    pub fn subsections(&self) -> &[SectionId] {
        &self.subsections
    }

    /// Parent section, `None` for top-level sections.
    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Owning textbook.
    pub fn textbook(&self) -> TextbookId {
        self.textbook
    }

    /// Named concepts found in the text, keyed by concept id.
    pub fn concepts(&self) -> &std::collections::BTreeMap<String, Concept> {
        &self.concepts
    }

    /// Concept names in key order.
    pub fn concept_names(&self) -> Vec<String> {
        self.concepts.values().map(|c| c.name.clone()).collect()
    }

    /// Whether the section should be exported in datasets.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
