use serde::{Deserialize, Serialize};

use crate::mode::Phase;

/// A per-organization failure recorded at the task boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitError {
    /// Organization domain.
    pub organization: String,
    pub phase: Phase,
    pub message: String,
}

/// Counters for one run. Only the orchestrator writes to these, after each
/// unit has settled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRunStats {
    pub organizations_total: usize,
    pub scraped: usize,
    pub analyzed: usize,
    /// Already-analyzed reports taken as input by a `campaign_only` run.
    pub reports_loaded: usize,
    pub qualified: usize,
    pub tier1_qualified: usize,
    pub tier2_qualified: usize,
    /// Analyzed but not qualified. A normal outcome, not an error.
    pub qualification_skips: usize,
    pub campaigns_composed: usize,
    pub campaigns_ready: usize,
    /// Qualified organizations left for a later run by the batch-size cap.
    pub campaigns_deferred: usize,
    pub outreach_units: usize,
    pub errors: Vec<UnitError>,
}

impl PipelineRunStats {
    pub(crate) fn record_error(&mut self, organization: &str, phase: Phase, message: String) {
        tracing::warn!(
            organization = %organization,
            phase = %phase,
            error = %message,
            "unit failed"
        );
        self.errors.push(UnitError {
            organization: organization.to_string(),
            phase,
            message,
        });
    }

    #[must_use]
    pub fn errors_in(&self, phase: Phase) -> usize {
        self.errors.iter().filter(|e| e.phase == phase).count()
    }
}
