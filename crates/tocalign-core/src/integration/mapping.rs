use crate::textbook::SectionId;
use serde::{Serialize, Serializer};
use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Key of the integration mapping: a base section, or the "no match" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTarget {
    /// Assigned to this base section
    Base(SectionId),
    /// Best score was below the threshold, or there was nothing to match
    Unmatched,
}

impl MatchTarget {
    /// The base section, if matched.
    pub fn base(&self) -> Option<SectionId> {
        match self {
            MatchTarget::Base(id) => Some(*id),
            MatchTarget::Unmatched => None,
        }
    }
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTarget::Base(id) => write!(f, "{}", id),
            MatchTarget::Unmatched => write!(f, "unmatched"),
        }
    }
}

impl Serialize for MatchTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MatchTarget::Base(id) => serializer.serialize_some(&id.as_u64()),
            MatchTarget::Unmatched => serializer.serialize_none(),
        }
    }
}

/// Assignment of other-textbook sections to base sections.
///
/// Every assigned section is held under exactly one target. Assigning a
/// section again moves it: the mapping only remembers its latest target.
/// Targets whose set becomes empty are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationMapping {
    targets: BTreeMap<MatchTarget, BTreeSet<SectionId>>,
    assigned: HashMap<SectionId, MatchTarget>,
}

impl IntegrationMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `section` under `target`, removing it from its previous target.
    ///
    /// Returns the previous target, if the section had one.
    pub fn assign(&mut self, section: SectionId, target: MatchTarget) -> Option<MatchTarget> {
        let previous = self.assigned.insert(section, target);
        if let Some(old) = previous {
            if old != target {
                if let btree_map::Entry::Occupied(mut entry) = self.targets.entry(old) {
                    entry.get_mut().remove(&section);
                    if entry.get().is_empty() {
                        entry.remove();
                    }
                }
            }
        }
        self.targets.entry(target).or_default().insert(section);
        previous
    }

    /// Sections assigned to `target` (empty if none).
    pub fn get(&self, target: &MatchTarget) -> impl Iterator<Item = SectionId> + '_ {
        self.targets.get(target).into_iter().flatten().copied()
    }

    /// Set of sections assigned to `target`, if any.
    pub fn sections(&self, target: &MatchTarget) -> Option<&BTreeSet<SectionId>> {
        self.targets.get(target)
    }

    /// Sections assigned to a base section.
    pub fn matches_for(&self, base: SectionId) -> Option<&BTreeSet<SectionId>> {
        self.targets.get(&MatchTarget::Base(base))
    }

    /// Sections in the "no match" set.
    pub fn unmatched(&self) -> Option<&BTreeSet<SectionId>> {
        self.targets.get(&MatchTarget::Unmatched)
    }

    /// Number of sections in the "no match" set.
    pub fn unmatched_count(&self) -> usize {
        self.unmatched().map_or(0, BTreeSet::len)
    }

    /// Current target of a section.
    pub fn target_of(&self, section: SectionId) -> Option<MatchTarget> {
        self.assigned.get(&section).copied()
    }

    /// Iterates `(target, sections)` in target order (base sections by id, then unmatched).
    pub fn iter(&self) -> impl Iterator<Item = (&MatchTarget, &BTreeSet<SectionId>)> {
        self.targets.iter()
    }

    /// Every `(target, section)` pair.
    pub fn pairs(&self) -> BTreeSet<(MatchTarget, SectionId)> {
        self.targets
            .iter()
            .flat_map(|(t, set)| set.iter().map(move |s| (*t, *s)))
            .collect()
    }

    /// Total number of assigned sections.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Returns `true` if nothing has been assigned.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl FromIterator<(MatchTarget, SectionId)> for IntegrationMapping {
    fn from_iter<I: IntoIterator<Item = (MatchTarget, SectionId)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (target, section) in iter {
            mapping.assign(section, target);
        }
        mapping
    }
}
