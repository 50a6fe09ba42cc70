use super::book::{Textbook, TextbookSource};
use crate::error::LoadError;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Produces a base textbook and the textbooks to align against it.
pub trait DocumentLoader {
    /// Loads `(base, others)`.
    fn load(&self) -> Result<(Textbook, Vec<Textbook>), LoadError>;
}

/// Loads textbooks from JSON files, one [`TextbookSource`] per file.
///
/// The first path is the base textbook.
#[derive(Debug, Clone)]
pub struct JsonLoader {
    paths: Vec<PathBuf>,
}

impl JsonLoader {
    /// Creates a loader over the given files, base textbook first.
    pub fn new<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }

    /// Reads and parses a single textbook file.
    pub fn read_source(path: &Path) -> Result<TextbookSource, LoadError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            path: display,
            source,
        })
    }
}

impl DocumentLoader for JsonLoader {
    #[instrument(skip_all, fields(files = self.paths.len()))]
    fn load(&self) -> Result<(Textbook, Vec<Textbook>), LoadError> {
        let mut textbooks = self
            .paths
            .iter()
            .map(|path| Self::read_source(path).map(Textbook::from_source))
            .collect::<Result<Vec<_>, _>>()?;

        if textbooks.is_empty() {
            return Err(LoadError::NoTextbooks);
        }
        let base = textbooks.remove(0);
        info!(
            "Loaded base textbook '{}' ({} sections) and {} other textbook(s)",
            base.name(),
            base.len(),
            textbooks.len()
        );
        Ok((base, textbooks))
    }
}

/// Builds textbooks from sources already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryLoader {
    base: TextbookSource,
    others: Vec<TextbookSource>,
}

impl InMemoryLoader {
    /// Creates a loader over in-memory sources.
    pub fn new(base: TextbookSource, others: Vec<TextbookSource>) -> Self {
        Self { base, others }
    }
}

impl DocumentLoader for InMemoryLoader {
    fn load(&self) -> Result<(Textbook, Vec<Textbook>), LoadError> {
        Ok((
            Textbook::from_source(self.base.clone()),
            self.others.iter().cloned().map(Textbook::from_source).collect(),
        ))
    }
}
