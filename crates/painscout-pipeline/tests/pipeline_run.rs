//! End-to-end runs against a local `wiremock` site: real HTTP fetcher, real
//! analysis, JSON-lines outreach file.

use painscout_analysis::{Analyzer, EvidenceExtractor, PainIndexCalculator, WeightTable};
use painscout_core::{Organization, PageContent};
use painscout_pipeline::{
    load_reports, write_reports, JsonlOutreachSink, Orchestrator, Phase, PipelineSettings,
    RunBatch, RunMode, RunState,
};
use painscout_scraper::{FetchError, HttpPageFetcher, PageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAINFUL_HOME: &str = r#"<html><body>
    <a href="/dealer-login.aspx">Dealer Login</a>
    <a href="https://b2b.acme.com/">B2B Portal</a>
    <a href="/catalog.pdf">Catalog</a>
    <p>Request a quote. Find a rep. Call to order.</p>
    <footer>© 2011 Acme</footer>
    </body></html>"#;

/// Home URLs are https; the mock server speaks plain http.
struct PlainHttp(HttpPageFetcher);

impl PageFetcher for PlainHttp {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        let url = url.replacen("https://", "http://", 1);
        self.0.fetch(&url).await
    }
}

fn fetcher() -> PlainHttp {
    PlainHttp(HttpPageFetcher::new(5, "painscout-test/0.1", 0, 0).expect("failed to build fetcher"))
}

fn analyzer() -> Analyzer {
    Analyzer::new(
        EvidenceExtractor::new(2024),
        PainIndexCalculator::new(WeightTable::standard()).expect("standard weights are valid"),
    )
}

fn org(id: &str, domain: &str) -> Organization {
    Organization {
        id: id.to_string(),
        company_name: format!("{id} Industrial"),
        domain: domain.to_string(),
        sku_count_estimate: None,
        channel_count: None,
        employee_count: None,
        trade_shows: Vec::new(),
    }
}

#[tokio::test]
async fn full_run_then_campaign_only_rerun() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(PAINFUL_HOME),
        )
        .mount(&server)
        .await;
    let host = server.uri().trim_start_matches("http://").to_string();

    let dir = std::env::temp_dir().join(format!("painscout-run-{}", uuid::Uuid::new_v4()));
    let outreach = dir.join("campaigns.jsonl");
    let pipeline = Orchestrator::new(
        fetcher(),
        JsonlOutreachSink::new(&outreach),
        analyzer(),
        PipelineSettings::default(),
    )
    .expect("valid settings");

    // Port 9 on localhost refuses connections, so the second unit fails to scrape.
    let batch = RunBatch::from_organizations(vec![org("acme", &host), org("gone", "127.0.0.1:9")]);
    let outcome = pipeline.run(RunMode::Full, batch).await;

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.stats.scraped, 1);
    assert_eq!(outcome.stats.errors_in(Phase::Scrape), 1);
    assert_eq!(outcome.stats.campaigns_ready, 1);
    assert_eq!(outcome.stats.outreach_units, 5);

    let report = &outcome.reports[0];
    assert!(report.qualification.qualified);
    assert!(report.profile.psi_score >= 70, "psi {}", report.profile.psi_score);
    // The dealer login link 404s on the mock site.
    assert_eq!(report.page_failures.len(), 1);

    let lines = std::fs::read_to_string(&outreach).expect("outreach file written");
    assert_eq!(lines.lines().count(), 1);
    assert!(lines.contains(&report.campaign.as_ref().expect("campaign").campaign_id));

    let reports_path = dir.join("reports.json");
    write_reports(&reports_path, &outcome.reports).expect("reports written");
    let prior = load_reports(&reports_path).expect("reports load");

    // Campaigns already composed are not composed or delivered again.
    let rerun = pipeline
        .run(RunMode::CampaignOnly, RunBatch::from_reports(prior))
        .await;
    assert_eq!(rerun.state, RunState::Completed);
    assert_eq!(rerun.stats.campaigns_composed, 0);
    assert_eq!(rerun.stats.outreach_units, 5);
    let lines = std::fs::read_to_string(&outreach).expect("outreach file still there");
    assert_eq!(lines.lines().count(), 1);

    std::fs::remove_dir_all(&dir).ok();
}
