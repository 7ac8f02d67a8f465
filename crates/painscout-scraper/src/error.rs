use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Failure reported by a non-HTTP fetcher (browser pool, fixture replay).
    #[error("fetch failed for {url}: {reason}")]
    Unavailable { url: String, reason: String },
}

/// Failure of a whole scrape unit. Only an unreachable home page is fatal for
/// the unit; secondary pages degrade evidence instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("home page for {domain} unreachable: {source}")]
    HomePageUnreachable {
        domain: String,
        #[source]
        source: FetchError,
    },

    #[error("home page for {domain} returned an empty body")]
    EmptyHomePage { domain: String },
}
