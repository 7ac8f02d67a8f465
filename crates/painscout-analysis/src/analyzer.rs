//! Extraction, scoring and qualification wired together for one organization.

use std::path::Path;

use painscout_core::{ConfigError, FetchedPages, Organization};
use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceBundle;
use crate::extractor::EvidenceExtractor;
use crate::index::{PainIndexCalculator, PainProfile};
use crate::qualification::{QualificationResult, QualificationScorer};
use crate::weights::{load_weight_table, WeightTable};

/// Everything analysis learned about one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationAnalysis {
    pub evidence: EvidenceBundle,
    pub profile: PainProfile,
    pub qualification: QualificationResult,
}

pub struct Analyzer {
    extractor: EvidenceExtractor,
    calculator: PainIndexCalculator,
    scorer: QualificationScorer,
}

impl Analyzer {
    #[must_use]
    pub fn new(extractor: EvidenceExtractor, calculator: PainIndexCalculator) -> Self {
        Self {
            extractor,
            calculator,
            scorer: QualificationScorer,
        }
    }

    /// Current-year extractor with weights from `weights_path`, or the standard
    /// table when no path is given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the weight file cannot be loaded or validated.
    pub fn from_weights_path(weights_path: Option<&Path>) -> Result<Self, ConfigError> {
        let weights = match weights_path {
            Some(path) => load_weight_table(path)?,
            None => WeightTable::standard(),
        };
        Ok(Self::new(
            EvidenceExtractor::for_current_year(),
            PainIndexCalculator::new(weights)?,
        ))
    }

    #[must_use]
    pub fn analyze(&self, organization: &Organization, pages: &FetchedPages) -> OrganizationAnalysis {
        let evidence = self.extractor.extract(organization, pages);
        let profile = self.calculator.calculate(&evidence);
        let qualification = self.scorer.score(&profile, &evidence);

        tracing::info!(
            organization = %organization.domain,
            psi = profile.psi_score,
            tier = %profile.tier,
            primary = %profile.primary_pain,
            qualified = qualification.qualified,
            "organization analyzed"
        );

        OrganizationAnalysis {
            evidence,
            profile,
            qualification,
        }
    }
}
