//! Single-organization and configuration inspection commands.

use std::path::Path;

use painscout_analysis::{load_weight_table, Analyzer, PainIndexCalculator, WeightTable};
use painscout_core::{load_organizations, AppConfig, Organization};
use painscout_pipeline::{DryRunSink, Orchestrator, PipelineSettings, RunBatch, RunMode};

use crate::run::build_fetcher;

/// Analyze one domain without composing anything and print the report.
pub(crate) async fn run_analyze(config: &AppConfig, domain: &str) -> anyhow::Result<()> {
    let organization = Organization::from_domain(domain)?;
    let analyzer = Analyzer::from_weights_path(config.weights_path.as_deref())?;
    let orchestrator = Orchestrator::new(
        build_fetcher(config)?,
        DryRunSink,
        analyzer,
        PipelineSettings::from_config(config),
    )?;

    let outcome = orchestrator
        .run(
            RunMode::AnalysisOnly,
            RunBatch::from_organizations(vec![organization]),
        )
        .await;

    if let Some(error) = outcome.stats.errors.first() {
        anyhow::bail!("{} [{}]: {}", error.organization, error.phase, error.message);
    }
    let report = outcome
        .reports
        .first()
        .ok_or_else(|| anyhow::anyhow!("no report produced for {domain}"))?;
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Load the roster and weight table through the same validation a run uses.
pub(crate) fn run_validate(config: &AppConfig, organizations: Option<&Path>) -> anyhow::Result<()> {
    let roster_path = organizations.unwrap_or(config.organizations_path.as_path());
    let roster = load_organizations(roster_path)?;
    println!(
        "organizations: {} entries in {}",
        roster.len(),
        roster_path.display()
    );

    let (weights, source) = match config.weights_path.as_deref() {
        Some(path) => (load_weight_table(path)?, path.display().to_string()),
        None => (WeightTable::standard(), "built-in".to_string()),
    };
    let calculator = PainIndexCalculator::new(weights)?;
    println!("weights ({source}):");
    for (category, weight) in calculator.weights().iter() {
        println!("  {:<28} {weight:.2}", category.as_str());
    }
    Ok(())
}
