//! Evidence extraction, Pain Signal Index scoring and qualification.
//!
//! Fetched pages go in, a per-category [`EvidenceBundle`] comes out of the
//! [`EvidenceExtractor`]; the [`PainIndexCalculator`] folds the bundle into a
//! weighted [`PainProfile`]; the [`QualificationScorer`] decides whether the
//! organization is actionable. Everything here is synchronous and pure.

pub mod analyzer;
pub mod error;
pub mod evidence;
pub mod extractor;
pub mod heuristics;
pub mod index;
pub mod qualification;
pub mod weights;

pub use analyzer::{Analyzer, OrganizationAnalysis};
pub use error::ExtractionFailure;
pub use evidence::{
    CategoryOutcome, Degradation, Evidence, EvidenceAccumulator, EvidenceBundle,
    EvidenceStrength, MAX_SINGLE_CONTRIBUTION,
};
pub use extractor::EvidenceExtractor;
pub use heuristics::{CategoryHeuristic, ExtractionInput};
pub use index::{round_psi, PainIndexCalculator, PainProfile, Tier, Urgency};
pub use qualification::{QualificationResult, QualificationScorer, QualificationTier};
pub use weights::{load_weight_table, parse_weight_table, WeightTable, WEIGHT_TOLERANCE};
