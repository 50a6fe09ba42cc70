use crate::config::UNMATCHED_KEY;
use crate::error::LoadError;
use crate::integration::MatchTarget;
use crate::textbook::{SectionId, Textbook};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{info, instrument};

/// Human-labelled ground truth: for each target, the other-textbook sections
/// an expert says belong there.
///
/// Unlike [`crate::integration::IntegrationMapping`], an expert may list the
/// same section under several targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpertMapping {
    targets: BTreeMap<MatchTarget, BTreeSet<SectionId>>,
}

impl ExpertMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `section` under `target`.
    pub fn insert(&mut self, target: MatchTarget, section: SectionId) {
        self.targets.entry(target).or_default().insert(section);
    }

    /// Sections listed under `target`, if any.
    pub fn get(&self, target: &MatchTarget) -> Option<&BTreeSet<SectionId>> {
        self.targets.get(target)
    }

    /// Every `(target, section)` pair.
    pub fn pairs(&self) -> BTreeSet<(MatchTarget, SectionId)> {
        self.targets
            .iter()
            .flat_map(|(t, set)| set.iter().map(move |s| (*t, *s)))
            .collect()
    }

    /// Number of `(target, section)` pairs.
    pub fn len(&self) -> usize {
        self.targets.values().map(BTreeSet::len).sum()
    }

    /// Returns `true` if the expert listed nothing.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<(MatchTarget, SectionId)> for ExpertMapping {
    fn from_iter<I: IntoIterator<Item = (MatchTarget, SectionId)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (target, section) in iter {
            mapping.insert(target, section);
        }
        mapping
    }
}

/// Source of expert mappings for a (base, other) textbook pair.
pub trait ExpertMappingProvider {
    /// Resolves the ground truth against the loaded textbooks.
    fn expert_mapping(&self, base: &Textbook, other: &Textbook) -> Result<ExpertMapping, LoadError>;
}

/// Expert mapping stored as JSON, keyed by section keys.
///
/// ```json
/// { "1.1": ["2", "2.1"], "unmatched": ["3"] }
/// ```
///
/// Keys of the object are base-section keys (or `"unmatched"`); values list
/// other-section keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonExpertMapping {
    entries: BTreeMap<String, Vec<String>>,
}

impl JsonExpertMapping {
    /// Wraps already-parsed entries.
    pub fn from_entries(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Reads entries from a JSON file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&text).map_err(|source| LoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        info!("Loaded expert mapping with {} targets", entries.len());
        Ok(Self { entries })
    }
}

fn lookup(textbook: &Textbook, key: &str) -> Result<SectionId, LoadError> {
    textbook
        .section_by_key(key)
        .map(|s| s.id())
        .ok_or_else(|| LoadError::UnknownSection {
            textbook: textbook.name().to_string(),
            key: key.to_string(),
        })
}

impl ExpertMappingProvider for JsonExpertMapping {
    fn expert_mapping(
        &self,
        base: &Textbook,
        other: &Textbook,
    ) -> Result<ExpertMapping, LoadError> {
        let mut mapping = ExpertMapping::new();
        for (base_key, other_keys) in &self.entries {
            let target = if base_key == UNMATCHED_KEY {
                MatchTarget::Unmatched
            } else {
                MatchTarget::Base(lookup(base, base_key)?)
            };
            for key in other_keys {
                mapping.insert(target, lookup(other, key)?);
            }
        }
        Ok(mapping)
    }
}
