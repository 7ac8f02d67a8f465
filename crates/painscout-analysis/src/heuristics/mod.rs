//! Built-in per-category heuristics and the trait they share.
//!
//! Every heuristic reads a pre-digested [`ExtractionInput`] so page text,
//! markup and links are computed once per organization, not once per category.

mod channel_conflict;
mod rep_performance;
mod sales_enablement;
mod sku_complexity;
mod technology;

use painscout_core::pages::path_of;
use painscout_core::{FetchedPages, Organization, PageContent, PageLink, PageRole, PainCategory};

use crate::error::ExtractionFailure;
use crate::evidence::Evidence;

pub use channel_conflict::ChannelConflictHeuristic;
pub use rep_performance::RepPerformanceHeuristic;
pub use sales_enablement::SalesEnablementHeuristic;
pub use sku_complexity::SkuComplexityHeuristic;
pub use technology::TechnologyHeuristic;

/// One category's evidence rule set.
///
/// Implementations must be pure: the same input yields the same evidence.
pub trait CategoryHeuristic: Send + Sync {
    fn category(&self) -> PainCategory;

    /// # Errors
    ///
    /// Returns [`ExtractionFailure`] when the input cannot be evaluated. The
    /// extractor degrades only this category.
    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure>;
}

/// The built-in heuristic for `category`.
#[must_use]
pub fn builtin_heuristic(category: PainCategory) -> Box<dyn CategoryHeuristic> {
    match category {
        PainCategory::SalesEnablementCollapse => Box::new(SalesEnablementHeuristic),
        PainCategory::TechnologyObsolescence => Box::new(TechnologyHeuristic),
        PainCategory::RepPerformanceCrisis => Box::new(RepPerformanceHeuristic),
        PainCategory::SkuComplexity => Box::new(SkuComplexityHeuristic),
        PainCategory::ChannelConflict => Box::new(ChannelConflictHeuristic),
    }
}

const ROLES: [PageRole; 3] = [PageRole::Home, PageRole::Pricing, PageRole::Portal];

fn slot(role: PageRole) -> usize {
    match role {
        PageRole::Home => 0,
        PageRole::Pricing => 1,
        PageRole::Portal => 2,
    }
}

/// Page content for one organization, pre-processed for heuristics.
pub struct ExtractionInput<'a> {
    pub organization: &'a Organization,
    pub pages: &'a FetchedPages,
    /// Calendar year staleness checks are measured against.
    pub reference_year: i32,
    texts: [String; 3],
    markups: [String; 3],
    home_links: Vec<PageLink>,
}

impl<'a> ExtractionInput<'a> {
    #[must_use]
    pub fn new(organization: &'a Organization, pages: &'a FetchedPages, reference_year: i32) -> Self {
        let page_of = |role: PageRole| match role {
            PageRole::Home => pages.home.as_ref(),
            PageRole::Pricing => pages.pricing.as_ref(),
            PageRole::Portal => pages.portal.as_ref(),
        };
        let texts = ROLES.map(|role| page_of(role).map(PageContent::text).unwrap_or_default());
        let markups = ROLES.map(|role| page_of(role).map(PageContent::markup).unwrap_or_default());
        Self {
            organization,
            pages,
            reference_year,
            texts,
            markups,
            home_links: pages.home_links(),
        }
    }

    #[must_use]
    pub fn page(&self, role: PageRole) -> Option<&'a PageContent> {
        match role {
            PageRole::Home => self.pages.home.as_ref(),
            PageRole::Pricing => self.pages.pricing.as_ref(),
            PageRole::Portal => self.pages.portal.as_ref(),
        }
    }

    #[must_use]
    pub fn has_home(&self) -> bool {
        self.pages.home.is_some()
    }

    /// Lowercased visible text of `role`, empty when the page is missing.
    #[must_use]
    pub fn text(&self, role: PageRole) -> &str {
        &self.texts[slot(role)]
    }

    /// Lowercased markup of `role`, empty when the page is missing.
    #[must_use]
    pub fn markup(&self, role: PageRole) -> &str {
        &self.markups[slot(role)]
    }

    /// Visible text of several pages joined by a space.
    #[must_use]
    pub fn joined_text(&self, roles: &[PageRole]) -> String {
        roles
            .iter()
            .map(|&role| self.text(role))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn home_links(&self) -> &[PageLink] {
        &self.home_links
    }

    /// Ensure none of the pages a heuristic reads is a binary payload.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionFailure::BinaryContent`] for the first binary page.
    pub fn readable(&self, roles: &[PageRole]) -> Result<(), ExtractionFailure> {
        for &role in roles {
            if let Some(page) = self.page(role).filter(|p| p.looks_binary()) {
                return Err(ExtractionFailure::BinaryContent {
                    role,
                    url: page.url.clone(),
                });
            }
        }
        Ok(())
    }
}

/// First needle contained in `haystack`.
pub(crate) fn first_match(haystack: &str, needles: &[&'static str]) -> Option<&'static str> {
    needles.iter().copied().find(|needle| haystack.contains(needle))
}

pub(crate) fn is_pdf(url: &str) -> bool {
    path_of(url).is_some_and(|path| path.ends_with(".pdf"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use painscout_core::{FetchedPages, Organization, PageContent};

    pub(crate) const REFERENCE_YEAR: i32 = 2024;

    pub(crate) fn org() -> Organization {
        Organization::from_domain("acme.com").expect("valid domain")
    }

    pub(crate) fn home(html: &str) -> FetchedPages {
        FetchedPages {
            home: Some(PageContent::new("https://acme.com/", html)),
            ..FetchedPages::default()
        }
    }

    /// A modern-looking home page: viewport, search, prices, chat widget.
    pub(crate) const CLEAN_HOME: &str = r#"<html><head>
        <meta name="viewport" content="width=device-width">
        <script src="https://widget.intercom.io/widget/abc"></script>
        </head><body>
        <form role="search" action="/search"><input type="search" name="q"></form>
        <p>Hex bolts from $4.99</p>
        <footer>© 2024 Acme</footer>
        </body></html>"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::{home, org, REFERENCE_YEAR};
    use super::*;

    #[test]
    fn builtin_heuristics_cover_their_own_category() {
        for category in PainCategory::ALL {
            assert_eq!(builtin_heuristic(category).category(), category);
        }
    }

    #[test]
    fn readable_rejects_binary_pages() {
        let org = org();
        let pages = home("GIF89a\0\0\u{1}binary");
        let input = ExtractionInput::new(&org, &pages, REFERENCE_YEAR);
        let err = input.readable(&[PageRole::Home]).unwrap_err();
        assert!(matches!(
            err,
            ExtractionFailure::BinaryContent {
                role: PageRole::Home,
                ..
            }
        ));
        assert!(input.readable(&[PageRole::Pricing]).is_ok());
    }

    #[test]
    fn missing_pages_read_as_empty() {
        let org = org();
        let pages = FetchedPages::default();
        let input = ExtractionInput::new(&org, &pages, REFERENCE_YEAR);
        assert!(!input.has_home());
        assert_eq!(input.text(PageRole::Home), "");
        assert_eq!(input.joined_text(&[PageRole::Home, PageRole::Pricing]), "");
        assert!(input.home_links().is_empty());
    }

    #[test]
    fn pdf_detection_ignores_query_strings() {
        assert!(is_pdf("https://acme.com/Catalog.PDF?v=3"));
        assert!(!is_pdf("https://acme.com/pdf-viewer"));
    }
}
