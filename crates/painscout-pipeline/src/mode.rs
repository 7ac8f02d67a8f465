use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Full,
    AnalysisOnly,
    CampaignOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Scrape,
    Analyze,
    Compose,
    PrepareOutreach,
    Report,
}

impl RunMode {
    /// Phases in execution order.
    #[must_use]
    pub fn phases(self) -> &'static [Phase] {
        match self {
            RunMode::Full => &[
                Phase::Scrape,
                Phase::Analyze,
                Phase::Compose,
                Phase::PrepareOutreach,
                Phase::Report,
            ],
            RunMode::AnalysisOnly => &[Phase::Scrape, Phase::Analyze, Phase::Report],
            RunMode::CampaignOnly => &[Phase::Compose, Phase::PrepareOutreach, Phase::Report],
        }
    }

    #[must_use]
    pub fn runs(self, phase: Phase) -> bool {
        self.phases().contains(&phase)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Full => "full",
            RunMode::AnalysisOnly => "analysis_only",
            RunMode::CampaignOnly => "campaign_only",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full" => Ok(RunMode::Full),
            "analysis_only" => Ok(RunMode::AnalysisOnly),
            "campaign_only" => Ok(RunMode::CampaignOnly),
            other => Err(format!(
                "unknown run mode '{other}' (expected full, analysis_only or campaign_only)"
            )),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Scrape => write!(f, "SCRAPE"),
            Phase::Analyze => write!(f, "ANALYZE"),
            Phase::Compose => write!(f, "COMPOSE"),
            Phase::PrepareOutreach => write!(f, "PREPARE_OUTREACH"),
            Phase::Report => write!(f, "REPORT"),
        }
    }
}
