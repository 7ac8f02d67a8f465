//! Shared domain types and configuration for painscout.
//!
//! Everything here is consumed by the scraper, analysis, campaign and pipeline
//! crates: the closed pain-category enumeration, the organization roster,
//! fetched page content, and the environment-driven application config.

pub mod app_config;
pub mod category;
pub mod config;
pub mod organizations;
pub mod pages;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use category::{CategoryTable, PainCategory};
pub use config::{load_app_config, load_app_config_from_env};
pub use organizations::{
    load_organizations, normalize_domain, parse_organizations, Organization, OrganizationEntry,
    OrganizationsFile, UNKNOWN_ORGANIZATION_NAME,
};
pub use pages::{FetchedPages, PageContent, PageFailure, PageLink, PageRole};

/// Configuration failures. These are fatal and surface before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown pain category: {0}")]
    UnknownCategory(String),

    #[error("malformed weight table: {0}")]
    WeightTable(String),

    #[error("validation error: {0}")]
    Validation(String),
}
