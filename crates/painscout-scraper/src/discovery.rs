//! Relevant-page discovery and the per-organization scrape unit.
//!
//! The home page is always fetched. From its links we pick a best-guess
//! pricing page and a best-guess login/portal page by keyword score, then
//! fetch both concurrently. Only the home page is required.

use painscout_core::pages::{host_of, path_of};
use painscout_core::{FetchedPages, Organization, PageContent, PageFailure, PageLink, PageRole};

use crate::error::{FetchError, ScrapeError};
use crate::fetcher::PageFetcher;

/// Keyword weights for locating a pricing / ordering page.
const PRICING_KEYWORDS: &[(&str, i32)] = &[
    ("pricing", 6),
    ("price-list", 5),
    ("price list", 5),
    ("prices", 4),
    ("quote", 3),
    ("shop", 2),
    ("buy", 2),
    ("order", 2),
    ("catalog", 1),
    ("products", 1),
];

/// Keyword weights for locating a customer login or dealer portal.
const PORTAL_KEYWORDS: &[(&str, i32)] = &[
    ("login", 6),
    ("log in", 6),
    ("log-in", 6),
    ("sign in", 6),
    ("sign-in", 6),
    ("signin", 6),
    ("portal", 5),
    ("dealer", 3),
    ("b2b", 3),
    ("my account", 3),
    ("account", 2),
    ("partner", 2),
];

/// Pick the best pricing-page candidate among `links`.
#[must_use]
pub fn select_pricing_page(links: &[PageLink], home_url: &str) -> Option<String> {
    select_by_keywords(links, home_url, PRICING_KEYWORDS, None)
}

/// Pick the best login/portal candidate among `links`, never returning `exclude`.
#[must_use]
pub fn select_portal_page(
    links: &[PageLink],
    home_url: &str,
    exclude: Option<&str>,
) -> Option<String> {
    select_by_keywords(links, home_url, PORTAL_KEYWORDS, exclude)
}

/// Highest-scoring same-site, non-document link. Ties go to the earliest link.
fn select_by_keywords(
    links: &[PageLink],
    home_url: &str,
    keywords: &[(&str, i32)],
    exclude: Option<&str>,
) -> Option<String> {
    let home_host = host_of(home_url)?;
    let home_trimmed = home_url.trim_end_matches('/');

    let mut best: Option<(i32, &PageLink)> = None;
    for link in links {
        if link.url.trim_end_matches('/') == home_trimmed || exclude == Some(link.url.as_str()) {
            continue;
        }
        if !is_same_site(&link.url, &home_host) || is_document(&link.url) {
            continue;
        }
        let haystack = link.haystack();
        let score: i32 = keywords
            .iter()
            .filter(|(kw, _)| haystack.contains(kw))
            .map(|(_, w)| *w)
            .sum();
        if score > 0 && best.is_none_or(|(top, _)| score > top) {
            best = Some((score, link));
        }
    }
    best.map(|(_, link)| link.url.clone())
}

fn is_same_site(url: &str, home_host: &str) -> bool {
    host_of(url).is_some_and(|host| host == home_host || host.ends_with(&format!(".{home_host}")))
}

fn is_document(url: &str) -> bool {
    let Some(path) = path_of(url) else {
        return false;
    };
    [".pdf", ".doc", ".docx", ".xls", ".xlsx", ".zip", ".jpg", ".png"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

/// Scrape one organization: home page, then pricing and portal pages.
///
/// # Errors
///
/// Returns [`ScrapeError`] only when the home page cannot be fetched or is
/// empty. Secondary page failures are recorded in
/// [`FetchedPages::failures`] instead.
pub async fn scrape_organization<F: PageFetcher>(
    fetcher: &F,
    organization: &Organization,
) -> Result<FetchedPages, ScrapeError> {
    let home_url = organization.home_url();
    let home = fetcher
        .fetch(&home_url)
        .await
        .map_err(|source| ScrapeError::HomePageUnreachable {
            domain: organization.domain.clone(),
            source,
        })?;

    if home.html.trim().is_empty() {
        return Err(ScrapeError::EmptyHomePage {
            domain: organization.domain.clone(),
        });
    }

    let links = home.links();
    let pricing_url = select_pricing_page(&links, &home.url);
    let portal_url = select_portal_page(&links, &home.url, pricing_url.as_deref());

    tracing::debug!(
        organization = %organization.domain,
        links = links.len(),
        pricing = pricing_url.as_deref().unwrap_or("-"),
        portal = portal_url.as_deref().unwrap_or("-"),
        "selected secondary pages"
    );

    let (pricing, portal) = futures::join!(
        fetch_optional(fetcher, pricing_url.as_deref()),
        fetch_optional(fetcher, portal_url.as_deref()),
    );

    let mut pages = FetchedPages {
        home: Some(home),
        ..FetchedPages::default()
    };
    pages.pricing = settle(organization, PageRole::Pricing, pricing, &mut pages.failures);
    pages.portal = settle(organization, PageRole::Portal, portal, &mut pages.failures);
    Ok(pages)
}

async fn fetch_optional<F: PageFetcher>(
    fetcher: &F,
    url: Option<&str>,
) -> Option<(String, Result<PageContent, FetchError>)> {
    let url = url?;
    Some((url.to_string(), fetcher.fetch(url).await))
}

fn settle(
    organization: &Organization,
    role: PageRole,
    outcome: Option<(String, Result<PageContent, FetchError>)>,
    failures: &mut Vec<PageFailure>,
) -> Option<PageContent> {
    match outcome? {
        (_, Ok(page)) => Some(page),
        (url, Err(e)) => {
            tracing::warn!(
                organization = %organization.domain,
                page = %role,
                url = %url,
                error = %e,
                "secondary page fetch failed; evidence will be weaker"
            );
            failures.push(PageFailure {
                role,
                url,
                reason: e.to_string(),
            });
            None
        }
    }
}
