//! Per-category evidence records and the bundle that holds one per category.

use std::collections::BTreeSet;

use painscout_core::{CategoryTable, PainCategory};
use serde::{Deserialize, Serialize};

/// Upper bound for any single indicator's contribution. Strictly below 1.0 so
/// no lone heuristic can max out a category.
pub const MAX_SINGLE_CONTRIBUTION: f64 = 0.5;

const WEAK_THRESHOLD: f64 = 0.3;
const STRONG_THRESHOLD: f64 = 0.6;

/// Qualitative label derived from a category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrength {
    None,
    Weak,
    Moderate,
    Strong,
}

impl EvidenceStrength {
    /// `score <= 0` is none, `< 0.3` weak, `< 0.6` moderate, otherwise strong.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() || score <= 0.0 {
            EvidenceStrength::None
        } else if score < WEAK_THRESHOLD {
            EvidenceStrength::Weak
        } else if score < STRONG_THRESHOLD {
            EvidenceStrength::Moderate
        } else {
            EvidenceStrength::Strong
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceStrength::None => "none",
            EvidenceStrength::Weak => "weak",
            EvidenceStrength::Moderate => "moderate",
            EvidenceStrength::Strong => "strong",
        }
    }
}

impl std::fmt::Display for EvidenceStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence for one pain category from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub category: PainCategory,
    /// Contribution in `[0.0, 1.0]`.
    pub score: f64,
    pub indicators_found: BTreeSet<String>,
    pub specific_findings: Vec<String>,
    pub evidence_strength: EvidenceStrength,
}

impl Evidence {
    /// Zero-score evidence with nothing found.
    #[must_use]
    pub fn empty(category: PainCategory) -> Self {
        Self::scored(category, 0.0)
    }

    /// Evidence carrying only a score, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn scored(category: PainCategory, score: f64) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Self {
            category,
            score,
            indicators_found: BTreeSet::new(),
            specific_findings: Vec::new(),
            evidence_strength: EvidenceStrength::from_score(score),
        }
    }
}

/// Additive builder used by heuristics. Each indicator's contribution is capped
/// at [`MAX_SINGLE_CONTRIBUTION`]; the total is capped at 1.0.
#[derive(Debug)]
pub struct EvidenceAccumulator {
    category: PainCategory,
    score: f64,
    indicators: BTreeSet<String>,
    findings: Vec<String>,
}

impl EvidenceAccumulator {
    #[must_use]
    pub fn new(category: PainCategory) -> Self {
        Self {
            category,
            score: 0.0,
            indicators: BTreeSet::new(),
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, indicator: &str, contribution: f64, finding: impl Into<String>) {
        let contribution = contribution.clamp(0.0, MAX_SINGLE_CONTRIBUTION);
        if contribution <= 0.0 {
            return;
        }
        self.score += contribution;
        self.indicators.insert(indicator.to_string());
        self.findings.push(finding.into());
    }

    #[must_use]
    pub fn finish(self) -> Evidence {
        let score = self.score.min(1.0);
        Evidence {
            category: self.category,
            score,
            indicators_found: self.indicators,
            specific_findings: self.findings,
            evidence_strength: EvidenceStrength::from_score(score),
        }
    }
}

/// What happened when one category's heuristic ran.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Extracted(Evidence),
    Degraded {
        category: PainCategory,
        reason: String,
    },
}

/// A category that fell back to zero-evidence, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub category: PainCategory,
    pub reason: String,
}

/// Exactly one [`Evidence`] per [`PainCategory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    evidence: CategoryTable<Evidence>,
    #[serde(default)]
    degraded: Vec<Degradation>,
}

impl Default for EvidenceBundle {
    fn default() -> Self {
        Self::empty()
    }
}

impl EvidenceBundle {
    /// Every category at zero evidence.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            evidence: CategoryTable::from_fn(Evidence::empty),
            degraded: Vec::new(),
        }
    }

    /// Bundle from bare scores; unlisted categories stay at zero.
    #[must_use]
    pub fn from_scores(scores: &[(PainCategory, f64)]) -> Self {
        scores.iter().fold(Self::empty(), |bundle, &(category, score)| {
            bundle.with_evidence(Evidence::scored(category, score))
        })
    }

    /// Fold per-category outcomes; degraded categories become zero-evidence.
    #[must_use]
    pub fn from_outcomes(outcomes: CategoryTable<CategoryOutcome>) -> Self {
        let mut degraded = Vec::new();
        let evidence = outcomes.map(|category, outcome| match outcome {
            CategoryOutcome::Extracted(evidence) => evidence.clone(),
            CategoryOutcome::Degraded { reason, .. } => {
                degraded.push(Degradation {
                    category,
                    reason: reason.clone(),
                });
                Evidence::empty(category)
            }
        });
        Self { evidence, degraded }
    }

    /// Replace the slot for `evidence.category`.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        let category = evidence.category;
        *self.evidence.get_mut(category) = evidence;
        self
    }

    #[must_use]
    pub fn get(&self, category: PainCategory) -> &Evidence {
        self.evidence.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Evidence> {
        self.evidence.values()
    }

    #[must_use]
    pub fn scores(&self) -> CategoryTable<f64> {
        self.evidence.map(|_, e| e.score)
    }

    #[must_use]
    pub fn degraded(&self) -> &[Degradation] {
        &self.degraded
    }

    /// Strongest evidence label across all categories.
    #[must_use]
    pub fn strongest(&self) -> EvidenceStrength {
        self.iter()
            .map(|e| e.evidence_strength)
            .max()
            .unwrap_or(EvidenceStrength::None)
    }
}
