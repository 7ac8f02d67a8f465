use std::collections::HashMap;
use std::sync::Mutex;

use painscout_analysis::{
    Evidence, EvidenceBundle, EvidenceExtractor, ExtractionFailure, ExtractionInput,
    CategoryHeuristic, PainIndexCalculator, QualificationScorer, WeightTable,
};
use painscout_core::{PageContent, PainCategory};
use painscout_scraper::FetchError;

use super::*;
use crate::sink::{DryRunSink, SinkError};

const PAINFUL_HOME: &str = r#"<a href="/dealer-login.aspx">Dealer Login</a>
    <a href="https://b2b.acme.com/">B2B Portal</a>
    <a href="/catalog.pdf">Catalog</a>
    <p>Request a quote. Find a rep. Call to order.</p>
    <footer>© 2011 Acme</footer>"#;

const QUIET_HOME: &str = r#"<form role="search" action="/search"><input type="search" name="q"></form>
    <a href="/shop">Shop</a>
    <p>Widget, $49.99. Add to cart and check out online.</p>
    <footer>© 2024</footer>"#;

/// Serves fixed HTML keyed by URL; anything else is unavailable. Panics on
/// any URL containing `panics_on`.
#[derive(Default)]
struct FixtureFetcher {
    pages: HashMap<String, String>,
    panics_on: Option<&'static str>,
}

impl FixtureFetcher {
    fn with_home(mut self, domain: &str, html: &str) -> Self {
        self.pages.insert(format!("https://{domain}"), html.to_string());
        self
    }
}

impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        if let Some(needle) = self.panics_on {
            assert!(!url.contains(needle), "fetcher blew up on {url}");
        }
        match self.pages.get(url.trim_end_matches('/')) {
            Some(html) => Ok(PageContent::new(url, html.clone())),
            None => Err(FetchError::Unavailable {
                url: url.to_string(),
                reason: "no fixture".to_string(),
            }),
        }
    }
}

/// Records campaign domains in delivery order; rejects `reject`.
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<String>>,
    reject: Option<String>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl OutreachSink for RecordingSink {
    async fn send(&self, campaign: &Campaign) -> Result<(), SinkError> {
        if self.reject.as_deref() == Some(campaign.domain.as_str()) {
            return Err(SinkError::Rejected {
                campaign_id: campaign.campaign_id.clone(),
                reason: "mailbox full".to_string(),
            });
        }
        self.sent.lock().unwrap().push(campaign.domain.clone());
        Ok(())
    }
}

/// Panics for one domain so the analysis task boundary can be exercised.
struct PanicsFor(&'static str);

impl CategoryHeuristic for PanicsFor {
    fn category(&self) -> PainCategory {
        PainCategory::SkuComplexity
    }

    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure> {
        assert_ne!(input.organization.domain, self.0, "heuristic blew up");
        Ok(Evidence::empty(PainCategory::SkuComplexity))
    }
}

fn analyzer() -> Analyzer {
    Analyzer::new(
        EvidenceExtractor::new(2024),
        PainIndexCalculator::new(WeightTable::standard()).unwrap(),
    )
}

fn orchestrator<S: OutreachSink>(
    fetcher: FixtureFetcher,
    sink: S,
    settings: PipelineSettings,
) -> Orchestrator<FixtureFetcher, S> {
    Orchestrator::new(fetcher, sink, analyzer(), settings).unwrap()
}

fn orgs(domains: &[&str]) -> Vec<Organization> {
    domains
        .iter()
        .map(|d| Organization::from_domain(d).unwrap())
        .collect()
}

fn prior_report(domain: &str, score: f64) -> OrganizationReport {
    let bundle = EvidenceBundle::from_scores(
        &PainCategory::ALL.map(|category| (category, score)),
    );
    let profile = PainIndexCalculator::new(WeightTable::standard())
        .unwrap()
        .calculate(&bundle);
    let qualification = QualificationScorer.score(&profile, &bundle);
    OrganizationReport {
        organization: Organization::from_domain(domain).unwrap(),
        profile,
        qualification,
        evidence: bundle,
        page_failures: Vec::new(),
        campaign: None,
    }
}

#[test]
fn zero_limits_are_rejected() {
    let settings = PipelineSettings {
        max_concurrent_orgs: 0,
        ..PipelineSettings::default()
    };
    let result = Orchestrator::new(FixtureFetcher::default(), DryRunSink, analyzer(), settings);
    assert!(matches!(result, Err(ConfigError::Validation(_))));

    let settings = PipelineSettings {
        campaign_batch_size: 0,
        ..PipelineSettings::default()
    };
    let result = Orchestrator::new(FixtureFetcher::default(), DryRunSink, analyzer(), settings);
    assert!(result.is_err());
}

#[tokio::test]
async fn one_unreachable_organization_does_not_stop_the_batch() {
    let fetcher = FixtureFetcher::default()
        .with_home("one.com", QUIET_HOME)
        .with_home("two.com", PAINFUL_HOME)
        .with_home("four.com", QUIET_HOME)
        .with_home("five.com", PAINFUL_HOME);
    let pipeline = orchestrator(fetcher, RecordingSink::default(), PipelineSettings::default());

    let outcome = pipeline
        .run(
            RunMode::Full,
            RunBatch::from_organizations(orgs(&[
                "one.com", "two.com", "three.com", "four.com", "five.com",
            ])),
        )
        .await;

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.stats.organizations_total, 5);
    assert_eq!(outcome.stats.scraped, 4);
    assert_eq!(outcome.stats.analyzed, 4);
    assert_eq!(outcome.stats.errors.len(), 1);
    assert_eq!(outcome.stats.errors[0].organization, "three.com");
    assert_eq!(outcome.stats.errors[0].phase, Phase::Scrape);

    let domains: Vec<&str> = outcome
        .reports
        .iter()
        .map(|r| r.organization.domain.as_str())
        .collect();
    assert_eq!(domains, ["one.com", "two.com", "four.com", "five.com"]);
}

#[tokio::test]
async fn full_run_composes_and_prepares_qualified_organizations() {
    let fetcher = FixtureFetcher::default()
        .with_home("acme.com", PAINFUL_HOME)
        .with_home("tidy.com", QUIET_HOME);
    let sink = RecordingSink::default();
    let pipeline = orchestrator(fetcher, sink, PipelineSettings::default());

    let outcome = pipeline
        .run(
            RunMode::Full,
            RunBatch::from_organizations(orgs(&["acme.com", "tidy.com"])),
        )
        .await;

    assert_eq!(outcome.stats.qualified, 1);
    assert_eq!(outcome.stats.qualification_skips, 1);
    assert_eq!(outcome.stats.campaigns_composed, 1);
    assert_eq!(outcome.stats.campaigns_ready, 1);
    assert_eq!(outcome.stats.outreach_units, 5);
    assert_eq!(pipeline.sink.sent(), ["acme.com"]);

    let acme = &outcome.reports[0];
    let campaign = acme.campaign.as_ref().unwrap();
    assert!(campaign.is_ready());
    assert_eq!(campaign.primary_pain, PainCategory::SalesEnablementCollapse);
    // The portal link on the home page has no fixture.
    assert!(!acme.page_failures.is_empty());
    assert!(outcome.reports[1].campaign.is_none());
    assert!(outcome.summary.contains("COMPLETED"));
}

#[tokio::test]
async fn analysis_only_never_composes() {
    let fetcher = FixtureFetcher::default().with_home("acme.com", PAINFUL_HOME);
    let pipeline = orchestrator(fetcher, RecordingSink::default(), PipelineSettings::default());

    let outcome = pipeline
        .run(
            RunMode::AnalysisOnly,
            RunBatch::from_organizations(orgs(&["acme.com"])),
        )
        .await;

    assert_eq!(outcome.stats.qualified, 1);
    assert_eq!(outcome.stats.campaigns_composed, 0);
    assert_eq!(outcome.stats.outreach_units, 0);
    assert!(outcome.reports[0].campaign.is_none());
    assert!(pipeline.sink.sent().is_empty());
}

#[tokio::test]
async fn empty_batch_is_fatal_but_still_reported() {
    let pipeline = orchestrator(
        FixtureFetcher::default(),
        RecordingSink::default(),
        PipelineSettings::default(),
    );

    let outcome = pipeline.run(RunMode::Full, RunBatch::default()).await;
    assert_eq!(outcome.state, RunState::Fatal);
    assert!(outcome.fatal_reason.is_some());
    assert!(outcome.reports.is_empty());
    assert!(outcome.summary.contains("FATAL"));

    let outcome = pipeline
        .run(
            RunMode::CampaignOnly,
            RunBatch::from_organizations(orgs(&["acme.com"])),
        )
        .await;
    assert_eq!(outcome.state, RunState::Fatal);
}

#[tokio::test]
async fn campaign_only_uses_prior_reports_and_skips_scraping() {
    let pipeline = orchestrator(
        FixtureFetcher::default(),
        RecordingSink::default(),
        PipelineSettings::default(),
    );
    let batch = RunBatch::from_reports(vec![
        prior_report("hot.com", 0.9),
        prior_report("cold.com", 0.1),
    ]);

    let outcome = pipeline.run(RunMode::CampaignOnly, batch).await;

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.stats.scraped, 0);
    assert_eq!(outcome.stats.analyzed, 0);
    assert_eq!(outcome.stats.reports_loaded, 2);
    assert_eq!(outcome.stats.qualified, 1);
    assert_eq!(outcome.stats.tier1_qualified, 1);
    assert_eq!(outcome.stats.tier2_qualified, 0);
    assert_eq!(outcome.stats.qualification_skips, 1);
    assert_eq!(outcome.stats.campaigns_ready, 1);
    assert_eq!(pipeline.sink.sent(), ["hot.com"]);
    assert!(outcome.stats.errors.is_empty());
}

#[tokio::test]
async fn batch_size_caps_composition_and_defers_the_rest() {
    let settings = PipelineSettings {
        campaign_batch_size: 2,
        ..PipelineSettings::default()
    };
    let pipeline = orchestrator(FixtureFetcher::default(), RecordingSink::default(), settings);
    let batch = RunBatch::from_reports(vec![
        prior_report("a.com", 0.9),
        prior_report("b.com", 0.9),
        prior_report("c.com", 0.9),
    ]);

    let outcome = pipeline.run(RunMode::CampaignOnly, batch).await;

    assert_eq!(outcome.stats.campaigns_composed, 2);
    assert_eq!(outcome.stats.campaigns_deferred, 1);
    assert_eq!(pipeline.sink.sent(), ["a.com", "b.com"]);
    assert!(outcome.reports[2].campaign.is_none());
}

#[tokio::test]
async fn rejected_delivery_leaves_campaign_in_draft() {
    let sink = RecordingSink {
        reject: Some("b.com".to_string()),
        ..RecordingSink::default()
    };
    let pipeline = orchestrator(FixtureFetcher::default(), sink, PipelineSettings::default());
    let batch = RunBatch::from_reports(vec![prior_report("a.com", 0.9), prior_report("b.com", 0.9)]);

    let outcome = pipeline.run(RunMode::CampaignOnly, batch).await;

    assert_eq!(outcome.stats.campaigns_composed, 2);
    assert_eq!(outcome.stats.campaigns_ready, 1);
    assert_eq!(outcome.stats.errors_in(Phase::Compose), 1);
    assert_eq!(outcome.stats.outreach_units, 5);
    let rejected = outcome.reports[1].campaign.as_ref().unwrap();
    assert_eq!(rejected.status, CampaignStatus::Draft);
}

#[tokio::test]
async fn draft_campaign_is_redelivered_on_the_next_run() {
    let sink = RecordingSink {
        reject: Some("a.com".to_string()),
        ..RecordingSink::default()
    };
    let first = orchestrator(FixtureFetcher::default(), sink, PipelineSettings::default())
        .run(
            RunMode::CampaignOnly,
            RunBatch::from_reports(vec![prior_report("a.com", 0.9)]),
        )
        .await;
    let draft = first.reports[0].campaign.clone().unwrap();
    assert_eq!(draft.status, CampaignStatus::Draft);

    let pipeline = orchestrator(
        FixtureFetcher::default(),
        RecordingSink::default(),
        PipelineSettings::default(),
    );
    let second = pipeline
        .run(RunMode::CampaignOnly, RunBatch::from_reports(first.reports))
        .await;

    assert_eq!(second.stats.campaigns_composed, 0);
    assert_eq!(second.stats.campaigns_ready, 1);
    assert_eq!(second.stats.outreach_units, 5);
    assert_eq!(pipeline.sink.sent(), ["a.com"]);
    let campaign = second.reports[0].campaign.as_ref().unwrap();
    assert_eq!(campaign.campaign_id, draft.campaign_id);
    assert!(campaign.is_ready());
}

#[tokio::test]
async fn ready_campaigns_are_not_sent_again() {
    let first = orchestrator(
        FixtureFetcher::default(),
        RecordingSink::default(),
        PipelineSettings::default(),
    )
    .run(
        RunMode::CampaignOnly,
        RunBatch::from_reports(vec![prior_report("a.com", 0.9)]),
    )
    .await;

    let pipeline = orchestrator(
        FixtureFetcher::default(),
        RecordingSink::default(),
        PipelineSettings::default(),
    );
    let second = pipeline
        .run(RunMode::CampaignOnly, RunBatch::from_reports(first.reports))
        .await;

    assert_eq!(second.stats.campaigns_ready, 0);
    assert!(pipeline.sink.sent().is_empty());
    // Still waiting for dispatch, so it is still counted.
    assert_eq!(second.stats.outreach_units, 5);
}

#[tokio::test]
async fn panicking_scrape_is_contained_to_its_organization() {
    let fetcher = FixtureFetcher {
        panics_on: Some("three.com"),
        ..FixtureFetcher::default()
    }
    .with_home("one.com", QUIET_HOME)
    .with_home("two.com", QUIET_HOME)
    .with_home("three.com", QUIET_HOME)
    .with_home("four.com", QUIET_HOME)
    .with_home("five.com", QUIET_HOME);
    let pipeline = orchestrator(fetcher, RecordingSink::default(), PipelineSettings::default());

    let outcome = pipeline
        .run(
            RunMode::Full,
            RunBatch::from_organizations(orgs(&[
                "one.com", "two.com", "three.com", "four.com", "five.com",
            ])),
        )
        .await;

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.stats.scraped, 4);
    assert_eq!(outcome.stats.analyzed, 4);
    assert_eq!(outcome.stats.errors.len(), 1);
    let error = &outcome.stats.errors[0];
    assert_eq!(error.organization, "three.com");
    assert_eq!(error.phase, Phase::Scrape);
    assert!(error.message.contains("panicked"), "{}", error.message);
    assert!(outcome.summary.contains("COMPLETED"));
}

#[tokio::test]
async fn panicking_analysis_is_contained_to_its_organization() {
    let fetcher = FixtureFetcher::default()
        .with_home("fine.com", QUIET_HOME)
        .with_home("boom.com", QUIET_HOME);
    let analyzer = Analyzer::new(
        EvidenceExtractor::new(2024).with_heuristic(Box::new(PanicsFor("boom.com"))),
        PainIndexCalculator::new(WeightTable::standard()).unwrap(),
    );
    let pipeline = Orchestrator::new(
        fetcher,
        RecordingSink::default(),
        analyzer,
        PipelineSettings::default(),
    )
    .unwrap();

    let outcome = pipeline
        .run(
            RunMode::AnalysisOnly,
            RunBatch::from_organizations(orgs(&["boom.com", "fine.com"])),
        )
        .await;

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.stats.scraped, 2);
    assert_eq!(outcome.stats.analyzed, 1);
    assert_eq!(outcome.stats.errors_in(Phase::Analyze), 1);
    assert_eq!(outcome.reports[0].organization.domain, "fine.com");
}
