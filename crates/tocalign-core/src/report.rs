//! Plain-text report of an integration.
//!
//! The report walks the base table of contents in document order. Each base
//! section is followed by the other-textbook sections matched to it:
//!
//! ```text
//! 1 Thermodynamics
//! 	1.1 Heat transfer
//! 	-	Other:1 Heat
//! ------------------------------------
//! 1 unmatched sections
//! ```

use crate::integration::TextbookIntegration;
use std::io::{self, Write};

const SEPARATOR: &str = "------------------------------------";

impl TextbookIntegration<'_> {
    /// Writes the report to `out`.
    pub fn print_matches<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let base = self.base_textbook();

        for section in base.all_subsections() {
            let depth = base.depth(section.id()).unwrap_or(0);
            let indent = "\t".repeat(depth);
            if let Some(entry) = base.print_entry(section.id(), &indent) {
                writeln!(out, "{}", entry)?;
            }

            for other_id in self.mapping().matches_for(section.id()).into_iter().flatten() {
                let Some(other) = self.find_section(*other_id) else {
                    continue;
                };
                let textbook = self
                    .find_textbook(other.textbook())
                    .map_or("?", |t| t.name());
                writeln!(
                    out,
                    "{}\t-\t{}:{} {}",
                    indent,
                    textbook,
                    other.key(),
                    other.header()
                )?;
            }
        }

        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "{} unmatched sections", self.mapping().unmatched_count())
    }

    /// Renders the report into a string.
    pub fn render_matches(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.print_matches(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use crate::integration::TextbookIntegration;
    use crate::error::ScoringError;
    use crate::scoring::{CosineSimilarity, Scored};
    use crate::test_utils::{dense_vectors, fixture_textbooks};
    use crate::textbook::{SectionSource, Textbook, TextbookSource};

    #[test]
    fn test_traversal_order() {
        let base = Textbook::from_source(TextbookSource::new(
            "Base",
            vec![
                SectionSource::new("A", "").with_subsections(vec![
                    SectionSource::new("A1", ""),
                    SectionSource::new("A2", ""),
                ]),
                SectionSource::new("B", ""),
            ],
        ));
        let others: Vec<Textbook> = Vec::new();
        let session = TextbookIntegration::new(&base, &others);

        assert_eq!(
            session.render_matches(),
            concat!(
                "1 A\n\t1.1 A1\n\t1.2 A2\n2 B\n",
                "------------------------------------\n",
                "0 unmatched sections\n"
            )
        );
    }

    #[test]
    fn test_match_lines_follow_their_base_section() {
        let (base, others) = fixture_textbooks();
        let mut session = TextbookIntegration::new(&base, &others);
        session.add_section_vectors(dense_vectors(&base, &others));
        session.integrate_sections(&CosineSimilarity, 0.5).unwrap();

        let report = session.render_matches();
        let lines: Vec<&str> = report.lines().collect();
        let heat_transfer = lines.iter().position(|l| *l == "\t1.1 Heat transfer").unwrap();
        assert_eq!(lines[heat_transfer + 1], "\t\t-\tOther:1 Heat");
        assert_eq!(lines.last(), Some(&"1 unmatched sections"));
    }

    #[test]
    fn test_matches_listed_in_id_order() {
        let (base, others) = fixture_textbooks();
        let mut session = TextbookIntegration::new(&base, &others);
        let everything = |_: Scored<'_>, _: Scored<'_>| -> Result<f64, ScoringError> { Ok(1.0) };
        session.integrate_sections(&everything, 0.5).unwrap();

        let report = session.render_matches();
        let matches: Vec<&str> = report.lines().filter(|l| l.contains("\t-\t")).collect();
        assert_eq!(
            matches,
            vec![
                "\t-\tOther:1 Heat",
                "\t-\tOther:2 Mirrors",
                "\t-\tOther:3 Quantum chromodynamics",
            ]
        );
    }
}
