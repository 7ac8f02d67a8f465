//! Runs every category heuristic over one organization's pages.

use chrono::Datelike;
use painscout_core::{CategoryTable, FetchedPages, Organization, PainCategory};

use crate::error::ExtractionFailure;
use crate::evidence::{CategoryOutcome, EvidenceBundle};
use crate::heuristics::{builtin_heuristic, CategoryHeuristic, ExtractionInput};

/// Produces an [`EvidenceBundle`] from fetched pages.
///
/// One heuristic per category. A heuristic that fails degrades only its own
/// category to zero-evidence; the bundle is always complete.
pub struct EvidenceExtractor {
    heuristics: CategoryTable<Box<dyn CategoryHeuristic>>,
    reference_year: i32,
}

impl EvidenceExtractor {
    /// Built-in heuristics, with staleness measured against `reference_year`.
    #[must_use]
    pub fn new(reference_year: i32) -> Self {
        Self {
            heuristics: CategoryTable::from_fn(builtin_heuristic),
            reference_year,
        }
    }

    /// Built-in heuristics against the current UTC year.
    #[must_use]
    pub fn for_current_year() -> Self {
        Self::new(chrono::Utc::now().year())
    }

    /// Replace the heuristic for the category it reports.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: Box<dyn CategoryHeuristic>) -> Self {
        let category = heuristic.category();
        *self.heuristics.get_mut(category) = heuristic;
        self
    }

    #[must_use]
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    #[must_use]
    pub fn extract(&self, organization: &Organization, pages: &FetchedPages) -> EvidenceBundle {
        let input = ExtractionInput::new(organization, pages, self.reference_year);
        let outcomes = self
            .heuristics
            .map(|category, heuristic| run_heuristic(category, heuristic.as_ref(), &input));
        let bundle = EvidenceBundle::from_outcomes(outcomes);

        tracing::debug!(
            organization = %organization.domain,
            degraded = bundle.degraded().len(),
            strongest = %bundle.strongest(),
            "evidence extracted"
        );
        bundle
    }
}

fn run_heuristic(
    category: PainCategory,
    heuristic: &dyn CategoryHeuristic,
    input: &ExtractionInput<'_>,
) -> CategoryOutcome {
    let result = heuristic.evaluate(input).and_then(|evidence| {
        if evidence.category == category {
            Ok(evidence)
        } else {
            Err(ExtractionFailure::CategoryMismatch {
                expected: category,
                actual: evidence.category,
            })
        }
    });

    match result {
        Ok(evidence) => CategoryOutcome::Extracted(evidence),
        Err(failure) => {
            tracing::warn!(
                organization = %input.organization.domain,
                category = %category,
                error = %failure,
                "heuristic failed; category degraded to zero evidence"
            );
            CategoryOutcome::Degraded {
                category,
                reason: failure.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
