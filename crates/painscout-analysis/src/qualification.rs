//! Go / no-go decision for outreach.

use serde::{Deserialize, Serialize};

use crate::evidence::{EvidenceBundle, EvidenceStrength};
use crate::index::{PainProfile, Tier};

/// Outreach cadence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualificationTier {
    #[serde(rename = "TIER_1_IMMEDIATE")]
    Tier1Immediate,
    #[serde(rename = "TIER_2_QUARTERLY")]
    Tier2Quarterly,
    #[serde(rename = "TIER_3_NURTURE")]
    Tier3Nurture,
}

impl From<Tier> for QualificationTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::A => QualificationTier::Tier1Immediate,
            Tier::B => QualificationTier::Tier2Quarterly,
            Tier::C => QualificationTier::Tier3Nurture,
        }
    }
}

impl std::fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualificationTier::Tier1Immediate => write!(f, "TIER_1_IMMEDIATE"),
            QualificationTier::Tier2Quarterly => write!(f, "TIER_2_QUARTERLY"),
            QualificationTier::Tier3Nurture => write!(f, "TIER_3_NURTURE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub qualified: bool,
    pub tier: QualificationTier,
    pub reasons: Vec<String>,
}

/// Qualifies an organization when its PSI tier is A or B and at least one
/// category in the bundle reaches [`EvidenceStrength::Moderate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QualificationScorer;

impl QualificationScorer {
    const MINIMUM_STRENGTH: EvidenceStrength = EvidenceStrength::Moderate;

    #[must_use]
    pub fn score(&self, profile: &PainProfile, bundle: &EvidenceBundle) -> QualificationResult {
        let tier = QualificationTier::from(profile.tier);
        let backed: Vec<_> = bundle
            .iter()
            .filter(|e| e.evidence_strength >= Self::MINIMUM_STRENGTH)
            .collect();

        let mut reasons = Vec::new();
        if profile.tier == Tier::C {
            reasons.push(format!(
                "PSI {} is below the tier B threshold of 40",
                profile.psi_score
            ));
        }
        if backed.is_empty() {
            reasons.push(format!(
                "no category reaches moderate evidence (strongest is {})",
                bundle.strongest()
            ));
        }
        if !reasons.is_empty() {
            return QualificationResult {
                qualified: false,
                tier,
                reasons,
            };
        }

        for evidence in backed {
            let label = evidence.category.label();
            let strength = evidence.evidence_strength;
            if evidence.specific_findings.is_empty() {
                reasons.push(format!("{label} ({strength})"));
            }
            reasons.extend(
                evidence
                    .specific_findings
                    .iter()
                    .map(|finding| format!("{label} ({strength}): {finding}")),
            );
        }

        QualificationResult {
            qualified: true,
            tier,
            reasons,
        }
    }
}
