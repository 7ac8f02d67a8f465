use std::sync::LazyLock;

use painscout_core::{PageRole, PainCategory};
use regex::Regex;

use super::{first_match, is_pdf, CategoryHeuristic, ExtractionInput};
use crate::error::ExtractionFailure;
use crate::evidence::{Evidence, EvidenceAccumulator};

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\$|€|£|usd\s?)\s?\d[\d,]*(?:\.\d{2})?").expect("valid price regex")
});

const QUOTE_GATES: &[&str] = &[
    "request a quote",
    "request quote",
    "get a quote",
    "call for pricing",
    "call for price",
    "contact us for pricing",
    "contact for pricing",
    "pricing available upon request",
    "price on request",
    "login to see pricing",
    "log in to see pricing",
    "sign in to see pricing",
    "login for pricing",
];

const REP_GATES: &[&str] = &[
    "contact your sales rep",
    "contact your rep",
    "contact your representative",
    "contact a sales representative",
    "speak to a sales representative",
    "through your local representative",
];

const SEARCH_MARKERS: &[&str] = &[
    r#"type="search""#,
    "type=search",
    r#"role="search""#,
    r#"name="q""#,
    r#"name="search""#,
    r#"action="/search"#,
    "/search?",
];

const CATALOG_WORDS: &[&str] = &[
    "catalog",
    "catalogue",
    "price list",
    "price-list",
    "pricelist",
    "brochure",
    "line card",
    "linecard",
];

/// Buyers cannot self-serve: no prices, no search, quote or rep gating.
pub struct SalesEnablementHeuristic;

impl CategoryHeuristic for SalesEnablementHeuristic {
    fn category(&self) -> PainCategory {
        PainCategory::SalesEnablementCollapse
    }

    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure> {
        input.readable(&[PageRole::Home, PageRole::Pricing])?;
        let mut acc = EvidenceAccumulator::new(self.category());
        if !input.has_home() {
            return Ok(acc.finish());
        }

        let commerce = input.joined_text(&[PageRole::Home, PageRole::Pricing]);

        if !PRICE_RE.is_match(&commerce) {
            let scope = if input.page(PageRole::Pricing).is_some() {
                "home or pricing page"
            } else {
                "home page"
            };
            acc.add(
                "no_visible_pricing",
                0.30,
                format!("No visible prices on the {scope}"),
            );
        }

        if let Some(phrase) = first_match(&commerce, QUOTE_GATES) {
            acc.add(
                "quote_gated_pricing",
                0.25,
                format!("Pricing gated behind \"{phrase}\""),
            );
        }

        if first_match(input.markup(PageRole::Home), SEARCH_MARKERS).is_none() {
            acc.add(
                "no_product_search",
                0.20,
                "No product search on the home page",
            );
        }

        if let Some(link) = input
            .home_links()
            .iter()
            .find(|l| is_pdf(&l.url) && first_match(&l.haystack(), CATALOG_WORDS).is_some())
        {
            acc.add(
                "pdf_catalog",
                0.25,
                format!("Catalog distributed as a PDF download ({})", link.url),
            );
        }

        if let Some(phrase) = first_match(&commerce, REP_GATES) {
            acc.add(
                "rep_gated_ordering",
                0.15,
                format!("Ordering routed through sales reps (\"{phrase}\")"),
            );
        }

        Ok(acc.finish())
    }
}
