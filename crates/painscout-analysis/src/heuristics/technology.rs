use std::collections::BTreeSet;
use std::sync::LazyLock;

use painscout_core::{PageRole, PainCategory};
use regex::Regex;

use super::{first_match, CategoryHeuristic, ExtractionInput};
use crate::error::ExtractionFailure;
use crate::evidence::{Evidence, EvidenceAccumulator};

static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:©|\(c\)|copyright)\s*(?:(?:19|20)\d{2}\s*[-–]\s*)?((?:19|20)\d{2})")
        .expect("valid copyright regex")
});

/// A copyright this many years behind the reference year counts as stale.
const STALE_AFTER_YEARS: i32 = 3;

const LOGIN_WORDS: &[&str] = &[
    "login",
    "log in",
    "log-in",
    "sign in",
    "sign-in",
    "signin",
    "portal",
    "my account",
];

const LEGACY_MARKERS: &[&str] = &[
    ".aspx",
    ".asp\"",
    ".asp?",
    ".cfm",
    ".jsp",
    "__viewstate",
    "jquery-1.",
    "jquery/1.",
    "<frameset",
    ".swf",
    "shockwave",
];

const VIEWPORT_MARKERS: &[&str] = &[r#"name="viewport""#, "name='viewport'", "name=viewport"];

/// Fragmented or aging web estate.
pub struct TechnologyHeuristic;

impl CategoryHeuristic for TechnologyHeuristic {
    fn category(&self) -> PainCategory {
        PainCategory::TechnologyObsolescence
    }

    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure> {
        input.readable(&[PageRole::Home, PageRole::Portal])?;
        let mut acc = EvidenceAccumulator::new(self.category());
        let Some(home) = input.page(PageRole::Home) else {
            return Ok(acc.finish());
        };

        let portals = distinct_login_targets(input);
        if portals >= 2 {
            acc.add(
                "multiple_login_portals",
                0.35,
                format!("{portals} separate login portals linked from the home page"),
            );
        }

        let legacy = first_match(input.markup(PageRole::Home), LEGACY_MARKERS)
            .or_else(|| first_match(input.markup(PageRole::Portal), LEGACY_MARKERS))
            .or_else(|| {
                input
                    .home_links()
                    .iter()
                    .find_map(|l| first_match(&l.url.to_ascii_lowercase(), LEGACY_MARKERS))
            });
        if let Some(marker) = legacy {
            acc.add(
                "legacy_platform",
                0.25,
                format!("Legacy web stack marker `{marker}`"),
            );
        }

        if let Some(year) = latest_copyright_year(input.text(PageRole::Home)) {
            if input.reference_year - year >= STALE_AFTER_YEARS {
                acc.add(
                    "stale_copyright",
                    0.20,
                    format!("Copyright notice last updated {year}"),
                );
            }
        }

        let portal_insecure = input.page(PageRole::Portal).is_some_and(|p| !p.is_https());
        if !home.is_https() {
            acc.add("insecure_transport", 0.15, "Home page served over plain HTTP");
        } else if portal_insecure {
            acc.add(
                "insecure_transport",
                0.15,
                "Login portal served over plain HTTP",
            );
        }

        if first_match(input.markup(PageRole::Home), VIEWPORT_MARKERS).is_none() {
            acc.add(
                "no_mobile_viewport",
                0.15,
                "No mobile viewport declared on the home page",
            );
        }

        Ok(acc.finish())
    }
}

fn distinct_login_targets(input: &ExtractionInput<'_>) -> usize {
    input
        .home_links()
        .iter()
        .filter(|l| first_match(&l.haystack(), LOGIN_WORDS).is_some())
        .map(|l| l.url.trim_end_matches('/').to_ascii_lowercase())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Most recent year in any copyright notice, ranges resolved to their end.
fn latest_copyright_year(text: &str) -> Option<i32> {
    COPYRIGHT_RE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<i32>().ok())
        .max()
}
