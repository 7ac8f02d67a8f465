//! The `run` command: load a batch, drive the orchestrator, write results.

use std::path::PathBuf;

use painscout_analysis::Analyzer;
use painscout_core::{load_organizations, AppConfig};
use painscout_pipeline::{
    load_reports, write_reports, DryRunSink, JsonlOutreachSink, Orchestrator, OutreachSink,
    PipelineSettings, RunBatch, RunMode, RunOutcome, RunState,
};
use painscout_scraper::HttpPageFetcher;

#[derive(Debug)]
pub(crate) struct RunArgs {
    pub mode: RunMode,
    pub organizations: Option<PathBuf>,
    pub prior_reports: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

pub(crate) fn build_fetcher(config: &AppConfig) -> anyhow::Result<HttpPageFetcher> {
    HttpPageFetcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build page fetcher: {e}"))
}

fn load_batch(config: &AppConfig, args: &RunArgs) -> anyhow::Result<RunBatch> {
    if args.mode == RunMode::CampaignOnly {
        let path = args.prior_reports.as_deref().ok_or_else(|| {
            anyhow::anyhow!("--prior-reports is required for a campaign-only run")
        })?;
        return Ok(RunBatch::from_reports(load_reports(path)?));
    }

    let path = args
        .organizations
        .as_deref()
        .unwrap_or(config.organizations_path.as_path());
    let organizations = load_organizations(path)?;
    tracing::info!(
        path = %path.display(),
        organizations = organizations.len(),
        "roster loaded"
    );
    Ok(RunBatch::from_organizations(organizations))
}

async fn drive<S: OutreachSink>(
    config: &AppConfig,
    sink: S,
    mode: RunMode,
    batch: RunBatch,
) -> anyhow::Result<RunOutcome> {
    let analyzer = Analyzer::from_weights_path(config.weights_path.as_deref())?;
    let orchestrator = Orchestrator::new(
        build_fetcher(config)?,
        sink,
        analyzer,
        PipelineSettings::from_config(config),
    )?;
    Ok(orchestrator.run(mode, batch).await)
}

/// # Errors
///
/// Returns an error on configuration or input-file problems, when the report
/// file cannot be written, or when the run ends FATAL. Per-organization
/// failures only appear in the summary.
pub(crate) async fn run_pipeline(config: &AppConfig, args: RunArgs) -> anyhow::Result<()> {
    let batch = load_batch(config, &args)?;

    let outcome = if args.dry_run {
        drive(config, DryRunSink, args.mode, batch).await?
    } else {
        let sink = JsonlOutreachSink::new(&config.outreach_path);
        drive(config, sink, args.mode, batch).await?
    };

    print!("{}", outcome.summary);

    if let Some(path) = &args.output {
        write_reports(path, &outcome.reports)?;
        tracing::info!(
            path = %path.display(),
            reports = outcome.reports.len(),
            "reports written"
        );
    }

    if outcome.state == RunState::Fatal {
        anyhow::bail!(
            "pipeline run {} failed: {}",
            outcome.run_id,
            outcome.fatal_reason.as_deref().unwrap_or("unknown reason")
        );
    }
    Ok(())
}
