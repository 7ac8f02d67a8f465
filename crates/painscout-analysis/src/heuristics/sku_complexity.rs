use std::collections::BTreeSet;
use std::sync::LazyLock;

use painscout_core::{PageRole, PainCategory};
use regex::Regex;

use super::{first_match, CategoryHeuristic, ExtractionInput};
use crate::error::ExtractionFailure;
use crate::evidence::{Evidence, EvidenceAccumulator};

static SKU_CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d{4,7})\s*\+?\s*(?:products|skus|items|parts|part numbers)\b")
        .expect("valid sku claim regex")
});

const LARGE_CATALOG: u64 = 1_000;
const VERY_LARGE_CATALOG: u64 = 10_000;
const DEEP_CATEGORY_LINKS: usize = 25;

const PART_NUMBER_WORDS: &[&str] = &[
    "part number",
    "part #",
    "part no",
    "item #",
    "item number",
    "sku #",
    "mfr #",
    "cross reference",
    "cross-reference",
];

const CATEGORY_PATHS: &[&str] = &[
    "/category",
    "/categories",
    "/collections/",
    "/catalog/",
    "/c/",
    "/product-category/",
    "/shop/",
];

const CONFIGURATOR_WORDS: &[&str] = &[
    "configurator",
    "configure your",
    "build your own",
    "custom sizes",
    "made to order",
    "specify options",
];

/// Catalog breadth that outgrows rep memory and static navigation.
pub struct SkuComplexityHeuristic;

impl CategoryHeuristic for SkuComplexityHeuristic {
    fn category(&self) -> PainCategory {
        PainCategory::SkuComplexity
    }

    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure> {
        input.readable(&[PageRole::Home])?;
        let mut acc = EvidenceAccumulator::new(self.category());
        let text = input.text(PageRole::Home);

        let declared = input.organization.sku_count_estimate.map(u64::from);
        let advertised = largest_sku_claim(text);
        let catalog = match (declared, advertised) {
            (Some(d), Some(a)) if a > d => Some((a, "advertised on site")),
            (Some(d), _) => Some((d, "estimated")),
            (None, Some(a)) => Some((a, "advertised on site")),
            (None, None) => None,
        };
        if let Some((count, source)) = catalog {
            let contribution = if count >= VERY_LARGE_CATALOG {
                0.50
            } else if count >= LARGE_CATALOG {
                0.30
            } else {
                0.0
            };
            acc.add(
                "large_catalog",
                contribution,
                format!("Catalog of roughly {count} SKUs ({source})"),
            );
        }

        if let Some(phrase) = first_match(text, PART_NUMBER_WORDS) {
            acc.add(
                "part_number_navigation",
                0.25,
                format!("Buyers navigate by part number (\"{phrase}\")"),
            );
        }

        let category_links = input
            .home_links()
            .iter()
            .filter(|l| first_match(&l.url.to_ascii_lowercase(), CATEGORY_PATHS).is_some())
            .map(|l| l.url.trim_end_matches('/'))
            .collect::<BTreeSet<_>>()
            .len();
        if category_links >= DEEP_CATEGORY_LINKS {
            acc.add(
                "deep_category_tree",
                0.25,
                format!("{category_links} category links in the home navigation"),
            );
        }

        if let Some(phrase) = first_match(text, CONFIGURATOR_WORDS) {
            acc.add(
                "configurable_products",
                0.15,
                format!("Configurable products (\"{phrase}\")"),
            );
        }

        Ok(acc.finish())
    }
}

fn largest_sku_claim(text: &str) -> Option<u64> {
    SKU_CLAIM_RE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1)?.as_str().replace(',', "").parse::<u64>().ok())
        .max()
}
