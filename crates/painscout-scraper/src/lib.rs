//! Page fetching for painscout.
//!
//! The analysis core only ever sees the [`PageFetcher`] capability. This crate
//! provides the HTTP implementation and the logic that decides which pages of
//! an organization's site are worth fetching.

pub mod client;
pub mod discovery;
pub mod error;
pub mod fetcher;
mod rate_limit;

pub use client::HttpPageFetcher;
pub use discovery::{scrape_organization, select_portal_page, select_pricing_page};
pub use error::{FetchError, ScrapeError};
pub use fetcher::PageFetcher;
