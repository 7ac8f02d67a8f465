//! HTTP implementation of [`PageFetcher`].

use std::time::Duration;

use painscout_core::PageContent;
use reqwest::Client;

use crate::error::FetchError;
use crate::fetcher::PageFetcher;
use crate::rate_limit::retry_with_backoff;

/// Fetches pages over plain HTTP with reqwest.
///
/// Handles rate limiting (429), not-found (404) and other non-2xx responses as
/// typed errors. Transient errors are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct HttpPageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpPageFetcher {
    /// Creates a fetcher with a request timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Build from the application config.
    ///
    /// # Errors
    ///
    /// See [`HttpPageFetcher::new`].
    pub fn from_config(config: &painscout_core::AppConfig) -> Result<Self, FetchError> {
        Self::new(
            config.fetch_timeout_secs,
            &config.user_agent,
            config.fetch_max_retries,
            config.fetch_retry_backoff_base_ms,
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<PageContent, FetchError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0);
            return Err(FetchError::RateLimited {
                url: url.to_owned(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;
        Ok(PageContent::new(final_url, html))
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_once(url)
        })
        .await
    }
}
