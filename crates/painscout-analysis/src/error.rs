use painscout_core::{PageRole, PainCategory};
use thiserror::Error;

/// Why a category heuristic could not produce evidence. The extractor turns
/// this into zero-evidence for that one category.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionFailure {
    #[error("binary content served as the {role} page ({url})")]
    BinaryContent { role: PageRole, url: String },

    #[error("heuristic registered for {expected} returned evidence for {actual}")]
    CategoryMismatch {
        expected: PainCategory,
        actual: PainCategory,
    },

    #[error("{category} heuristic failed: {reason}")]
    Heuristic {
        category: PainCategory,
        reason: String,
    },
}
