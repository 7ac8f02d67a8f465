use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Display name used when a roster entry carries no `company_name`.
pub const UNKNOWN_ORGANIZATION_NAME: &str = "Unknown Organization";

/// A target organization. Input to the pipeline; never mutated by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub company_name: String,
    pub domain: String,
    pub sku_count_estimate: Option<u32>,
    pub channel_count: Option<u32>,
    pub employee_count: Option<u32>,
    #[serde(default)]
    pub trade_shows: Vec<String>,
}

impl Organization {
    /// Build an organization from a bare domain with every optional field empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `domain` normalizes to nothing.
    pub fn from_domain(domain: &str) -> Result<Self, ConfigError> {
        OrganizationEntry {
            domain: domain.to_string(),
            ..OrganizationEntry::default()
        }
        .into_organization()
    }

    /// `https://` URL of the organization's home page.
    #[must_use]
    pub fn home_url(&self) -> String {
        format!("https://{}", self.domain)
    }
}

/// One row of the roster file as written by the uploader or scraper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationEntry {
    pub id: Option<String>,
    pub company_name: Option<String>,
    pub domain: String,
    pub sku_count_estimate: Option<u32>,
    pub channel_count: Option<u32>,
    pub employee_count: Option<u32>,
    #[serde(default)]
    pub trade_shows: Vec<String>,
}

impl OrganizationEntry {
    /// Normalize the entry into an [`Organization`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the domain is empty after
    /// normalization.
    pub fn into_organization(self) -> Result<Organization, ConfigError> {
        let domain = normalize_domain(&self.domain).ok_or_else(|| {
            ConfigError::Validation(format!(
                "organization domain must be non-empty (got '{}')",
                self.domain
            ))
        })?;

        let company_name = self
            .company_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_ORGANIZATION_NAME.to_string());

        let id = self
            .id
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| domain_slug(&domain));

        Ok(Organization {
            id,
            company_name,
            domain,
            sku_count_estimate: self.sku_count_estimate,
            channel_count: self.channel_count,
            employee_count: self.employee_count,
            trade_shows: self.trade_shows,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct OrganizationsFile {
    pub organizations: Vec<OrganizationEntry>,
}

/// Reduce a user-supplied domain or URL to a bare lowercase host.
///
/// Strips the scheme, a leading `www.`, any path/query, a port, and trailing
/// dots. Returns `None` when nothing is left.
#[must_use]
pub fn normalize_domain(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let host = host.trim_end_matches('.');

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

fn domain_slug(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load and validate the organization roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_organizations(path: &Path) -> Result<Vec<Organization>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: OrganizationsFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_organizations(file)
}

/// Parse and validate a roster from an in-memory YAML document.
///
/// # Errors
///
/// Returns `ConfigError` if the document does not parse or fails validation.
pub fn parse_organizations(yaml: &str) -> Result<Vec<Organization>, ConfigError> {
    let file: OrganizationsFile =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::YamlParse {
            path: "<inline>".to_string(),
            source: e,
        })?;
    validate_organizations(file)
}

fn validate_organizations(file: OrganizationsFile) -> Result<Vec<Organization>, ConfigError> {
    let mut seen_domains = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut organizations = Vec::with_capacity(file.organizations.len());

    for entry in file.organizations {
        let org = entry.into_organization()?;

        if !seen_domains.insert(org.domain.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate organization domain: '{}'",
                org.domain
            )));
        }
        if !seen_ids.insert(org.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate organization id: '{}' (from domain '{}')",
                org.id, org.domain
            )));
        }

        organizations.push(org);
    }

    Ok(organizations)
}

#[cfg(test)]
#[path = "organizations_test.rs"]
mod tests;
