//! Phase-by-phase batch runner.
//!
//! Each phase fans its units out over an order-preserving buffered stream,
//! waits for all of them to settle, then folds the results into
//! [`PipelineRunStats`] in input order. Nothing here returns an error once the
//! orchestrator has been constructed.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use painscout_analysis::{Analyzer, QualificationTier};
use painscout_campaign::{Campaign, CampaignComposer, CampaignStatus};
use painscout_core::{AppConfig, ConfigError, FetchedPages, Organization};
use painscout_scraper::{scrape_organization, PageFetcher};
use serde::Serialize;
use uuid::Uuid;

use crate::mode::{Phase, RunMode};
use crate::report::{render_summary, OrganizationReport};
use crate::sink::OutreachSink;
use crate::stats::PipelineRunStats;

/// Concurrency and batching limits for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub max_concurrent_orgs: usize,
    pub campaign_batch_size: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrent_orgs: 8,
            campaign_batch_size: 10,
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent_orgs: config.max_concurrent_orgs,
            campaign_batch_size: config.campaign_batch_size,
        }
    }

    fn validate(self) -> Result<(), ConfigError> {
        if self.max_concurrent_orgs == 0 {
            return Err(ConfigError::Validation(
                "max_concurrent_orgs must be at least 1".to_string(),
            ));
        }
        if self.campaign_batch_size == 0 {
            return Err(ConfigError::Validation(
                "campaign_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input to [`Orchestrator::run`]. `campaign_only` runs read
/// `prior_reports`; the other modes read `organizations`.
#[derive(Debug, Clone, Default)]
pub struct RunBatch {
    pub organizations: Vec<Organization>,
    pub prior_reports: Vec<OrganizationReport>,
}

impl RunBatch {
    #[must_use]
    pub fn from_organizations(organizations: Vec<Organization>) -> Self {
        Self {
            organizations,
            prior_reports: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_reports(prior_reports: Vec<OrganizationReport>) -> Self {
        Self {
            organizations: Vec::new(),
            prior_reports,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Completed,
    /// Nothing to process. The report is still produced.
    Fatal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub state: RunState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_reason: Option<String>,
    pub stats: PipelineRunStats,
    pub reports: Vec<OrganizationReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Human-readable summary from the REPORT phase.
    pub summary: String,
}

struct ScrapedUnit {
    organization: Organization,
    pages: FetchedPages,
}

/// Drives a batch through SCRAPE, ANALYZE, COMPOSE, PREPARE_OUTREACH, REPORT.
pub struct Orchestrator<F, S> {
    fetcher: F,
    sink: S,
    analyzer: Arc<Analyzer>,
    composer: CampaignComposer,
    settings: PipelineSettings,
}

impl<F: PageFetcher, S: OutreachSink> Orchestrator<F, S> {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if either limit in `settings` is 0.
    pub fn new(
        fetcher: F,
        sink: S,
        analyzer: Analyzer,
        settings: PipelineSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            fetcher,
            sink,
            analyzer: Arc::new(analyzer),
            composer: CampaignComposer,
            settings,
        })
    }

    pub async fn run(&self, mode: RunMode, batch: RunBatch) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut stats = PipelineRunStats::default();

        tracing::info!(
            run_id = %run_id,
            mode = %mode,
            organizations = batch.organizations.len(),
            prior_reports = batch.prior_reports.len(),
            "pipeline run started"
        );

        let fatal_reason = match mode {
            RunMode::CampaignOnly if batch.prior_reports.is_empty() => {
                Some("no analyzed reports supplied for a campaign_only run".to_string())
            }
            RunMode::Full | RunMode::AnalysisOnly if batch.organizations.is_empty() => {
                Some("no organizations to process".to_string())
            }
            _ => None,
        };

        let mut reports = Vec::new();
        if let Some(reason) = &fatal_reason {
            tracing::error!(run_id = %run_id, reason = %reason, "pipeline run cannot start");
        } else {
            reports = if mode.runs(Phase::Scrape) {
                stats.organizations_total = batch.organizations.len();
                let scraped = self.scrape_phase(batch.organizations, &mut stats).await;
                self.analyze_phase(scraped, &mut stats).await
            } else {
                stats.organizations_total = batch.prior_reports.len();
                stats.reports_loaded = batch.prior_reports.len();
                count_qualification(&batch.prior_reports, &mut stats);
                batch.prior_reports
            };

            if mode.runs(Phase::Compose) {
                self.compose_phase(&mut reports, &mut stats).await;
            }
            if mode.runs(Phase::PrepareOutreach) {
                stats.outreach_units = prepare_outreach(&reports);
            }
        }

        let state = if fatal_reason.is_some() {
            RunState::Fatal
        } else {
            RunState::Completed
        };
        let mut outcome = RunOutcome {
            run_id,
            mode,
            state,
            fatal_reason,
            stats,
            reports,
            started_at,
            finished_at: Utc::now(),
            summary: String::new(),
        };
        outcome.summary = render_summary(&outcome);

        tracing::info!(
            run_id = %run_id,
            state = ?outcome.state,
            analyzed = outcome.stats.analyzed,
            qualified = outcome.stats.qualified,
            campaigns_ready = outcome.stats.campaigns_ready,
            errors = outcome.stats.errors.len(),
            "pipeline run finished"
        );
        outcome
    }

    async fn scrape_phase(
        &self,
        organizations: Vec<Organization>,
        stats: &mut PipelineRunStats,
    ) -> Vec<ScrapedUnit> {
        let results: Vec<_> = stream::iter(&organizations)
            .map(|organization| {
                AssertUnwindSafe(scrape_organization(&self.fetcher, organization)).catch_unwind()
            })
            .buffered(self.settings.max_concurrent_orgs)
            .collect()
            .await;

        let mut units = Vec::with_capacity(results.len());
        for (organization, result) in organizations.into_iter().zip(results) {
            match result {
                Ok(Ok(pages)) => {
                    stats.scraped += 1;
                    units.push(ScrapedUnit {
                        organization,
                        pages,
                    });
                }
                Ok(Err(e)) => {
                    stats.record_error(&organization.domain, Phase::Scrape, e.to_string());
                }
                Err(payload) => stats.record_error(
                    &organization.domain,
                    Phase::Scrape,
                    format!("scrape task panicked: {}", panic_message(&*payload)),
                ),
            }
        }
        units
    }

    async fn analyze_phase(
        &self,
        units: Vec<ScrapedUnit>,
        stats: &mut PipelineRunStats,
    ) -> Vec<OrganizationReport> {
        let results: Vec<_> = stream::iter(units)
            .map(|unit| {
                let analyzer = Arc::clone(&self.analyzer);
                async move {
                    let domain = unit.organization.domain.clone();
                    let result =
                        tokio::task::spawn_blocking(move || analyze_unit(&analyzer, unit)).await;
                    (domain, result)
                }
            })
            .buffered(self.settings.max_concurrent_orgs)
            .collect()
            .await;

        let mut reports = Vec::with_capacity(results.len());
        for (domain, result) in results {
            match result {
                Ok(report) => {
                    stats.analyzed += 1;
                    reports.push(report);
                }
                Err(e) => stats.record_error(
                    &domain,
                    Phase::Analyze,
                    format!("analysis task failed: {e}"),
                ),
            }
        }
        count_qualification(&reports, stats);
        reports
    }

    /// Sequential: the sink sees campaigns in input order. Draft campaigns
    /// from an earlier run are redelivered as they are; ready and dispatched
    /// ones are left alone.
    async fn compose_phase(
        &self,
        reports: &mut [OrganizationReport],
        stats: &mut PipelineRunStats,
    ) {
        let mut attempted = 0usize;
        for report in reports.iter_mut() {
            let delivered = report
                .campaign
                .as_ref()
                .is_some_and(|c| c.status != CampaignStatus::Draft);
            if !report.qualification.qualified || delivered {
                continue;
            }
            if attempted >= self.settings.campaign_batch_size {
                stats.campaigns_deferred += 1;
                continue;
            }
            attempted += 1;

            let domain = report.organization.domain.clone();
            let mut campaign = if let Some(draft) = report.campaign.take() {
                tracing::info!(
                    organization = %domain,
                    campaign_id = %draft.campaign_id,
                    "redelivering draft campaign"
                );
                draft
            } else {
                match self.composer.compose(&report.organization, &report.profile) {
                    Ok(campaign) => {
                        stats.campaigns_composed += 1;
                        campaign
                    }
                    Err(e) => {
                        stats.record_error(&domain, Phase::Compose, e.to_string());
                        continue;
                    }
                }
            };

            match self.sink.send(&campaign).await {
                Ok(()) => {
                    campaign.status = CampaignStatus::Ready;
                    stats.campaigns_ready += 1;
                }
                Err(e) => stats.record_error(&domain, Phase::Compose, e.to_string()),
            }
            report.campaign = Some(campaign);
        }

        if stats.campaigns_deferred > 0 {
            tracing::info!(
                deferred = stats.campaigns_deferred,
                batch_size = self.settings.campaign_batch_size,
                "campaign batch size reached; remaining qualified organizations deferred"
            );
        }
    }
}

fn analyze_unit(analyzer: &Analyzer, unit: ScrapedUnit) -> OrganizationReport {
    let analysis = analyzer.analyze(&unit.organization, &unit.pages);
    let page_failures = unit
        .pages
        .failures
        .iter()
        .map(|f| format!("{} {}: {}", f.role, f.url, f.reason))
        .collect();
    OrganizationReport {
        organization: unit.organization,
        profile: analysis.profile,
        qualification: analysis.qualification,
        evidence: analysis.evidence,
        page_failures,
        campaign: None,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

fn count_qualification(reports: &[OrganizationReport], stats: &mut PipelineRunStats) {
    for report in reports {
        if !report.qualification.qualified {
            stats.qualification_skips += 1;
            continue;
        }
        stats.qualified += 1;
        match report.qualification.tier {
            QualificationTier::Tier1Immediate => stats.tier1_qualified += 1,
            QualificationTier::Tier2Quarterly => stats.tier2_qualified += 1,
            QualificationTier::Tier3Nurture => {}
        }
    }
}

/// Outreach steps waiting to go out. Dispatched campaigns are not counted.
fn prepare_outreach(reports: &[OrganizationReport]) -> usize {
    reports
        .iter()
        .filter_map(|r| r.campaign.as_ref())
        .filter(|c| c.is_ready())
        .map(Campaign::outreach_units)
        .sum()
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
