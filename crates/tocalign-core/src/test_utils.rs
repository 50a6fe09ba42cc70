//! Test utilities for tocalign-core.
//!
//! Shared textbook fixtures and hand-made vectors for unit tests.
//! Only compiled when running tests.

use crate::textbook::{Concept, SectionSource, Textbook, TextbookSource};
use crate::vectors::{Vector, VectorMap};

/// A small physics base textbook and one other textbook.
///
/// ```text
/// Base                          Other
/// 1   Thermodynamics            1 Heat
/// 1.1 Heat transfer             2 Mirrors
/// 1.2 Entropy                   3 Quantum chromodynamics
/// 2   Optics
/// 2.1 Refraction
/// ```
pub fn fixture_textbooks() -> (Textbook, Vec<Textbook>) {
    let base = Textbook::from_source(TextbookSource::new(
        "Base",
        vec![
            SectionSource::new("Thermodynamics", "heat energy and temperature")
                .with_subsections(vec![
                    SectionSource::new("Heat transfer", "heat moves by conduction and convection")
                        .with_concept(Concept::new("conduction")),
                    SectionSource::new("Entropy", "disorder and the second law"),
                ]),
            SectionSource::new("Optics", "light and lenses").with_subsections(vec![
                SectionSource::new("Refraction", "light bends at an interface"),
            ]),
        ],
    ));

    let other = Textbook::from_source(TextbookSource::new(
        "Other",
        vec![
            SectionSource::new("Heat", "heat flows by conduction")
                .with_concept(Concept::new("conduction")),
            SectionSource::new("Mirrors", "reflection of light by mirrors and lenses"),
            SectionSource::new("Quantum chromodynamics", "quarks and gluons"),
        ],
    ));

    (base, vec![other])
}

fn fixture_vector(textbook: &str, key: &str) -> Vec<f32> {
    match (textbook, key) {
        ("Base", "1") => vec![1.0, 0.0, 0.0, 0.0, 0.0],
        ("Base", "1.1") => vec![0.0, 1.0, 0.0, 0.0, 0.0],
        ("Base", "1.2") => vec![1.0, 0.0, 0.0, 1.0, 0.0],
        ("Base", "2") => vec![0.0, 0.0, 1.0, 0.0, 0.0],
        ("Base", "2.1") => vec![0.0, 0.0, 1.0, 1.0, 0.0],
        ("Other", "1") => vec![0.1, 1.0, 0.0, 0.0, 0.0],
        ("Other", "2") => vec![0.0, 0.0, 1.0, 0.2, 0.0],
        ("Other", "3") => vec![0.0, 0.0, 0.0, 0.0, 1.0],
        _ => panic!("no fixture vector for {}:{}", textbook, key),
    }
}

/// Dense vectors for every section of [`fixture_textbooks`].
///
/// At threshold 0.5 "Heat" matches "Heat transfer", "Mirrors" matches
/// "Optics" and "Quantum chromodynamics" is unmatched (orthogonal to
/// everything).
pub fn dense_vectors(base: &Textbook, others: &[Textbook]) -> VectorMap {
    std::iter::once(base)
        .chain(others.iter())
        .flat_map(|textbook| {
            textbook.all_subsections().iter().map(move |section| {
                (
                    section.id(),
                    Vector::Dense(fixture_vector(textbook.name(), section.key())),
                )
            })
        })
        .collect()
}
