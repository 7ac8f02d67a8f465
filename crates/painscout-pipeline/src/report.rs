//! Per-organization output records and the end-of-run summary.

use std::fmt::Write as _;
use std::path::Path;

use painscout_analysis::{EvidenceBundle, PainProfile, QualificationResult};
use painscout_campaign::Campaign;
use painscout_core::Organization;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mode::Phase;
use crate::orchestrator::{RunOutcome, RunState};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access report file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse report file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode reports: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Everything known about one organization at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationReport {
    pub organization: Organization,
    pub profile: PainProfile,
    pub qualification: QualificationResult,
    #[serde(default)]
    pub evidence: EvidenceBundle,
    /// Secondary pages that could not be fetched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page_failures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<Campaign>,
}

/// Read reports previously written by [`write_reports`].
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be read or is not a JSON array
/// of reports.
pub fn load_reports(path: &Path) -> Result<Vec<OrganizationReport>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReportError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Write reports as a pretty-printed JSON array, creating parent directories.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_reports(path: &Path, reports: &[OrganizationReport]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(reports).map_err(ReportError::Encode)?;
    std::fs::write(path, json).map_err(io_err)
}

/// Human-readable end-of-run summary.
#[must_use]
pub fn render_summary(outcome: &RunOutcome) -> String {
    let stats = &outcome.stats;
    let mut out = String::new();

    let state = match outcome.state {
        RunState::Completed => "COMPLETED",
        RunState::Fatal => "FATAL",
    };
    let _ = writeln!(
        out,
        "painscout run {} ({}) {state} in {} ms",
        outcome.run_id,
        outcome.mode,
        (outcome.finished_at - outcome.started_at).num_milliseconds()
    );
    if let Some(reason) = &outcome.fatal_reason {
        let _ = writeln!(out, "  fatal: {reason}");
    }

    let _ = write!(
        out,
        "  organizations: {} | scraped: {} | analyzed: {}",
        stats.organizations_total, stats.scraped, stats.analyzed
    );
    if stats.reports_loaded > 0 {
        let _ = write!(out, " | reports loaded: {}", stats.reports_loaded);
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "  qualified: {} (tier 1: {}, tier 2: {}) | skipped: {}",
        stats.qualified,
        stats.tier1_qualified,
        stats.tier2_qualified,
        stats.qualification_skips
    );
    let _ = writeln!(
        out,
        "  campaigns composed: {} | ready: {} | deferred: {} | outreach units: {}",
        stats.campaigns_composed,
        stats.campaigns_ready,
        stats.campaigns_deferred,
        stats.outreach_units
    );

    if !outcome.reports.is_empty() {
        let _ = writeln!(
            out,
            "\n  {:<32} {:>4}  {:<4} {:<28} status",
            "organization", "psi", "tier", "primary pain"
        );
        for report in &outcome.reports {
            let status = match (&report.campaign, report.qualification.qualified) {
                (Some(c), _) if c.is_ready() => "campaign ready",
                (Some(_), _) => "campaign not delivered",
                (None, true) => "qualified",
                (None, false) => "skipped",
            };
            let _ = writeln!(
                out,
                "  {:<32} {:>4}  {:<4} {:<28} {status}",
                report.organization.domain,
                report.profile.psi_score,
                report.profile.tier.to_string(),
                report.profile.primary_pain.as_str(),
            );
        }
    }

    if !stats.errors.is_empty() {
        let _ = writeln!(out, "\n  errors ({}):", stats.errors.len());
        for phase in [Phase::Scrape, Phase::Analyze, Phase::Compose] {
            for error in stats.errors.iter().filter(|e| e.phase == phase) {
                let _ = writeln!(out, "    [{phase}] {}: {}", error.organization, error.message);
            }
        }
    }
    out
}
