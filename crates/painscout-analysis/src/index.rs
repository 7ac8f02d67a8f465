//! Pain Signal Index: weighted aggregation of an [`EvidenceBundle`].

use painscout_core::{CategoryTable, ConfigError, PainCategory};
use serde::{Deserialize, Serialize};

use crate::evidence::{EvidenceBundle, EvidenceStrength};
use crate::weights::WeightTable;

const TIER_A_MIN_PSI: f64 = 70.0;
const TIER_B_MIN_PSI: f64 = 40.0;

/// Float noise finer than 1e-6 is snapped away before rounding, so 0.9 · 0.35
/// lands on 31.5 and rounds to 32.
const PSI_SNAP_SCALE: f64 = 1e6;

/// Maximum findings carried on a profile.
const MAX_KEY_FINDINGS: usize = 5;

/// PSI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// `psi >= 70` is A, `40 <= psi < 70` is B, anything lower is C.
    #[must_use]
    pub fn from_psi(psi: f64) -> Self {
        if psi >= TIER_A_MIN_PSI {
            Tier::A
        } else if psi >= TIER_B_MIN_PSI {
            Tier::B
        } else {
            Tier::C
        }
    }

    #[must_use]
    pub fn urgency(self) -> Urgency {
        match self {
            Tier::A => Urgency::Immediate,
            Tier::B => Urgency::Quarterly,
            Tier::C => Urgency::LongTerm,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    Quarterly,
    LongTerm,
}

impl Urgency {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Immediate => "immediate",
            Urgency::Quarterly => "quarterly",
            Urgency::LongTerm => "long_term",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted summary of one organization's pain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainProfile {
    /// Pain Signal Index, 0..=100.
    pub psi_score: u8,
    pub tier: Tier,
    pub urgency: Urgency,
    pub primary_pain: PainCategory,
    /// Per-category score in `[0.0, 1.0]`, before weighting.
    pub edp_breakdown: CategoryTable<f64>,
    /// All categories by score, highest first; ties in declaration order.
    pub ranked_pains: Vec<PainCategory>,
    /// Strength of the primary category, which is also the strongest.
    pub evidence_strength: EvidenceStrength,
    pub key_findings: Vec<String>,
}

/// Rounds a raw weighted index to an integer PSI, snapping float noise first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_psi(raw: f64) -> u8 {
    let snapped = (raw * PSI_SNAP_SCALE).round() / PSI_SNAP_SCALE;
    snapped.round().clamp(0.0, 100.0) as u8
}

/// Folds an [`EvidenceBundle`] into a [`PainProfile`] with validated weights.
#[derive(Debug, Clone)]
pub struct PainIndexCalculator {
    weights: WeightTable,
}

impl PainIndexCalculator {
    /// # Errors
    ///
    /// Returns [`ConfigError::WeightTable`] if `weights` does not validate.
    pub fn new(weights: WeightTable) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    #[must_use]
    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// `100 · Σ weight · score`, unrounded.
    #[must_use]
    pub fn raw_index(&self, bundle: &EvidenceBundle) -> f64 {
        100.0
            * self
                .weights
                .iter()
                .map(|(category, weight)| weight * bundle.get(category).score)
                .sum::<f64>()
    }

    #[must_use]
    pub fn calculate(&self, bundle: &EvidenceBundle) -> PainProfile {
        let psi_score = round_psi(self.raw_index(bundle));
        let tier = Tier::from_psi(f64::from(psi_score));

        let mut ranked_pains = PainCategory::ALL.to_vec();
        // Stable sort keeps declaration order among equal scores.
        ranked_pains.sort_by(|a, b| bundle.get(*b).score.total_cmp(&bundle.get(*a).score));
        let primary_pain = ranked_pains[0];

        let key_findings = ranked_pains
            .iter()
            .flat_map(|&c| bundle.get(c).specific_findings.iter().cloned())
            .take(MAX_KEY_FINDINGS)
            .collect();

        PainProfile {
            psi_score,
            tier,
            urgency: tier.urgency(),
            primary_pain,
            edp_breakdown: bundle.scores(),
            ranked_pains,
            evidence_strength: bundle.get(primary_pain).evidence_strength,
            key_findings,
        }
    }
}
