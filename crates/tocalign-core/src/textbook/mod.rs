//! Textbook data model and document loading.
//!
//! A [`Textbook`] owns a tree of [`Section`]s. Sections are identified by
//! [`SectionId`] (reference identity, not content), refer back to their
//! textbook by [`TextbookId`], and are laid out in document order so that
//! [`Textbook::all_subsections`] is cheap and stable.
//!
//! Textbooks are built from [`TextbookSource`] trees, usually deserialized by
//! a [`DocumentLoader`] such as [`JsonLoader`].

mod book;
mod loader;
mod section;

pub use book::{SectionSource, Textbook, TextbookSource};
pub use loader::{DocumentLoader, InMemoryLoader, JsonLoader};
pub use section::{Concept, Section, SectionId, TextbookId};
