use super::dataset::{build_dataset, DatasetRecord};
use super::mapping::{IntegrationMapping, MatchTarget};
use super::scores::ScoreMatrix;
use crate::config::DEFAULT_SEED;
use crate::corpus::corpus;
use crate::error::IntegrationError;
use crate::scoring::{ScoringAdapter, Similarity};
use crate::textbook::{Section, SectionId, Textbook, TextbookId};
use crate::vectors::VectorMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

/// Best-scoring base section for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    /// Highest-scoring base section, `None` if the base textbook is empty
    pub section: Option<SectionId>,
    /// Its score, `None` if the base textbook is empty
    pub score: Option<f64>,
}

/// Outcome of integrating one other-textbook section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// The integrated section
    pub section: SectionId,
    /// Where it was recorded
    pub target: MatchTarget,
    /// Best score found, `None` if there was nothing to score against
    pub score: Option<f64>,
}

/// A base textbook being integrated with sections from other textbooks.
///
/// The session owns everything a matching pass mutates: the accumulated
/// vectors, the score matrix, the integration mapping and the RNG used to
/// shuffle iterative runs. Several passes (for example lexical, then
/// semantic) run one after another against the same session; each pass
/// overwrites the assignment of every section it visits.
///
/// # Example
///
/// ```ignore
/// let mut session = TextbookIntegration::new(&base, &others);
/// let vectors = tfidf.vectorize(&session.corpus())?;
/// session.add_section_vectors(vectors);
/// session.integrate_sections(&CosineSimilarity, 0.6)?;
/// println!("{} unmatched", session.mapping().unmatched_count());
/// ```
#[derive(Debug)]
pub struct TextbookIntegration<'t> {
    base: &'t Textbook,
    others: &'t [Textbook],
    vectors: VectorMap,
    mapping: IntegrationMapping,
    scores: ScoreMatrix,
    rng: StdRng,
}

impl<'t> TextbookIntegration<'t> {
    /// Creates a session whose iterative runs are seeded with [`DEFAULT_SEED`].
    pub fn new(base: &'t Textbook, others: &'t [Textbook]) -> Self {
        Self::with_seed(base, others, DEFAULT_SEED)
    }

    /// Creates a session with an explicit shuffle seed.
    pub fn with_seed(base: &'t Textbook, others: &'t [Textbook], seed: u64) -> Self {
        Self {
            base,
            others,
            vectors: VectorMap::new(),
            mapping: IntegrationMapping::new(),
            scores: ScoreMatrix::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The base textbook.
    pub fn base_textbook(&self) -> &'t Textbook {
        self.base
    }

    /// The textbooks whose sections are being integrated.
    pub fn other_textbooks(&self) -> &'t [Textbook] {
        self.others
    }

    /// Base sections followed by every other textbook's sections.
    pub fn corpus(&self) -> Vec<&'t Section> {
        corpus(self.base, self.others)
    }

    /// Merges vectors into the session; new entries replace existing ones.
    pub fn add_section_vectors(&mut self, vectors: VectorMap) {
        debug!(added = vectors.len(), "Adding section vectors");
        self.vectors.extend(vectors);
    }

    /// Vectors accumulated so far.
    pub fn vectors(&self) -> &VectorMap {
        &self.vectors
    }

    /// Current integration mapping.
    pub fn mapping(&self) -> &IntegrationMapping {
        &self.mapping
    }

    /// Scores computed so far.
    pub fn scores(&self) -> &ScoreMatrix {
        &self.scores
    }

    /// Sections that found no match in the latest pass that visited them.
    pub fn unmatched(&self) -> Vec<&'t Section> {
        self.mapping
            .unmatched()
            .into_iter()
            .flatten()
            .filter_map(|&id| self.find_section(id))
            .collect()
    }

    /// Looks up a section in any textbook of the session.
    pub fn find_section(&self, id: SectionId) -> Option<&'t Section> {
        std::iter::once(self.base)
            .chain(self.others.iter())
            .find_map(|t| t.section(id))
    }

    /// Looks up a textbook of the session.
    pub fn find_textbook(&self, id: TextbookId) -> Option<&'t Textbook> {
        std::iter::once(self.base)
            .chain(self.others.iter())
            .find(|t| t.id() == id)
    }

    /// Scores `section` against every base section and returns the best.
    ///
    /// Ties go to the base section that comes first in document order. NaN
    /// scores are recorded but never selected.
    pub fn find_best_matching_section(
        &mut self,
        section: &Section,
        scoring: &dyn Similarity,
    ) -> Result<BestMatch, IntegrationError> {
        let adapter = ScoringAdapter::new(scoring);
        let mut best: Option<(SectionId, f64)> = None;
        let base = self.base;

        for base_section in base.all_subsections() {
            let score = adapter.score(base_section, section, &self.vectors)?;
            self.scores.insert(base_section.id(), section.id(), score);

            if score.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((base_section.id(), score));
            }
        }

        Ok(BestMatch {
            section: best.map(|(id, _)| id),
            score: best.map(|(_, score)| score),
        })
    }

    fn integrate(
        &mut self,
        section: &Section,
        scoring: &dyn Similarity,
        threshold: f64,
    ) -> Result<Assignment, IntegrationError> {
        let best = self.find_best_matching_section(section, scoring)?;
        let target = match (best.section, best.score) {
            (Some(base), Some(score)) if score >= threshold => MatchTarget::Base(base),
            _ => MatchTarget::Unmatched,
        };

        let previous = self.mapping.assign(section.id(), target);
        debug!(
            section = %section.id(),
            target = %target,
            score = ?best.score,
            moved = previous.is_some_and(|p| p != target),
            "Integrated section"
        );

        Ok(Assignment {
            section: section.id(),
            target,
            score: best.score,
        })
    }

    /// Integrates a single section from one of the other textbooks.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::UnknownSection` if the section is not in an
    /// other textbook, or `IntegrationError::Scoring` if scoring fails.
    pub fn integrate_section(
        &mut self,
        id: SectionId,
        scoring: &dyn Similarity,
        threshold: f64,
    ) -> Result<Assignment, IntegrationError> {
        let others = self.others;
        let section = others
            .iter()
            .find_map(|t| t.section(id))
            .ok_or(IntegrationError::UnknownSection(id))?;
        self.integrate(section, scoring, threshold)
    }

    /// Integrates every section of every other textbook in document order.
    ///
    /// Fully deterministic. A section whose best score is at least `threshold`
    /// is assigned to that base section; otherwise it is unmatched.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Scoring` as soon as a pair cannot be scored
    /// (typically a section without a vector). Assignments made before the
    /// failure are kept.
    #[instrument(skip_all, fields(threshold = threshold, vectors = self.vectors.len()))]
    pub fn integrate_sections(
        &mut self,
        scoring: &dyn Similarity,
        threshold: f64,
    ) -> Result<(), IntegrationError> {
        let others = self.others;
        let mut matched = 0usize;
        let mut total = 0usize;

        for textbook in others {
            for section in textbook.all_subsections() {
                let assignment = self.integrate(section, scoring, threshold)?;
                total += 1;
                if assignment.target != MatchTarget::Unmatched {
                    matched += 1;
                }
            }
        }

        info!(
            "Integration pass complete: {} of {} sections matched ({} unmatched overall)",
            matched,
            total,
            self.mapping.unmatched_count()
        );
        Ok(())
    }

    /// Integrates sections one at a time in shuffled order.
    ///
    /// Textbook order and each textbook's section order are shuffled with the
    /// session RNG, so the same seed and inputs give the same visiting order.
    /// Each call to `next` performs one full integration step. Consuming the
    /// whole iterator leaves the mapping with the same content as
    /// [`integrate_sections`](Self::integrate_sections); dropping it early
    /// leaves the steps taken so far in place.
    pub fn integrate_sections_iter<'s>(
        &'s mut self,
        scoring: &'s dyn Similarity,
        threshold: f64,
    ) -> IterativeIntegration<'s, 't> {
        let mut order: Vec<usize> = (0..self.others.len()).collect();
        order.shuffle(&mut self.rng);

        IterativeIntegration {
            session: self,
            scoring,
            threshold,
            textbooks: order.into_iter(),
            pending: Vec::new().into_iter(),
        }
    }

    /// Flattened records for labelling and export.
    pub fn dataset(&self) -> Vec<DatasetRecord> {
        build_dataset(self)
    }
}

/// Lazy, one-section-at-a-time integration. See
/// [`TextbookIntegration::integrate_sections_iter`].
pub struct IterativeIntegration<'s, 't> {
    session: &'s mut TextbookIntegration<'t>,
    scoring: &'s dyn Similarity,
    threshold: f64,
    textbooks: std::vec::IntoIter<usize>,
    pending: std::vec::IntoIter<&'t Section>,
}

impl<'s, 't> Iterator for IterativeIntegration<'s, 't> {
    type Item = Result<Assignment, IntegrationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(section) = self.pending.next() {
                return Some(self.session.integrate(section, self.scoring, self.threshold));
            }

            // Sections of the next textbook are shuffled only when we reach it.
            let index = self.textbooks.next()?;
            let others: &'t [Textbook] = self.session.others;
            let mut sections: Vec<&'t Section> = others[index].all_subsections().iter().collect();
            sections.shuffle(&mut self.session.rng);
            self.pending = sections.into_iter();
        }
    }
}
