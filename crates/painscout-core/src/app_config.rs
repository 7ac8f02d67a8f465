use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub organizations_path: PathBuf,
    /// Optional YAML override of the Pain Signal Index weights.
    pub weights_path: Option<PathBuf>,
    /// JSON-lines file composed campaigns are delivered to.
    pub outreach_path: PathBuf,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_ms: u64,
    pub max_concurrent_orgs: usize,
    pub campaign_batch_size: usize,
}

impl AppConfig {
    /// Config with every default applied. Used by tests and one-off commands.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            organizations_path: PathBuf::from("./config/organizations.yaml"),
            weights_path: None,
            outreach_path: PathBuf::from("./out/campaigns.jsonl"),
            fetch_timeout_secs: 30,
            user_agent: "painscout/0.1 (pain-signal-research)".to_string(),
            fetch_max_retries: 2,
            fetch_retry_backoff_base_ms: 500,
            max_concurrent_orgs: 8,
            campaign_batch_size: 10,
        }
    }
}
