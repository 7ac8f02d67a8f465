use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::defaults();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_positive_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let value = match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid(var, e.to_string()))?,
            Err(_) => default,
        };
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("PAINSCOUT_ENV", "development"))?;
    let log_level = or_default("PAINSCOUT_LOG_LEVEL", &defaults.log_level);
    let organizations_path = lookup("PAINSCOUT_ORGANIZATIONS_PATH")
        .map_or(defaults.organizations_path, PathBuf::from);
    let weights_path = lookup("PAINSCOUT_WEIGHTS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let outreach_path =
        lookup("PAINSCOUT_OUTREACH_PATH").map_or(defaults.outreach_path, PathBuf::from);

    let fetch_timeout_secs =
        parse_u64("PAINSCOUT_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?;
    let user_agent = or_default("PAINSCOUT_USER_AGENT", &defaults.user_agent);
    let fetch_max_retries = parse_u32("PAINSCOUT_MAX_RETRIES", defaults.fetch_max_retries)?;
    let fetch_retry_backoff_base_ms = parse_u64(
        "PAINSCOUT_RETRY_BACKOFF_BASE_MS",
        defaults.fetch_retry_backoff_base_ms,
    )?;
    let max_concurrent_orgs =
        parse_positive_usize("PAINSCOUT_MAX_CONCURRENT_ORGS", defaults.max_concurrent_orgs)?;
    let campaign_batch_size =
        parse_positive_usize("PAINSCOUT_CAMPAIGN_BATCH_SIZE", defaults.campaign_batch_size)?;

    Ok(AppConfig {
        env,
        log_level,
        organizations_path,
        weights_path,
        outreach_path,
        fetch_timeout_secs,
        user_agent,
        fetch_max_retries,
        fetch_retry_backoff_base_ms,
        max_concurrent_orgs,
        campaign_batch_size,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PAINSCOUT_ENV".to_string(),
            reason: format!("expected development, test or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
