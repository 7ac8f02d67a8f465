use painscout_core::{PageRole, PainCategory};

use super::{first_match, CategoryHeuristic, ExtractionInput};
use crate::error::ExtractionFailure;
use crate::evidence::{Evidence, EvidenceAccumulator};

const REP_LOCATOR: &[&str] = &[
    "find a rep",
    "find your rep",
    "find a sales rep",
    "find your sales rep",
    "rep locator",
    "find a representative",
    "locate a representative",
    "territory manager",
    "sales representative",
];

const PHONE_FAX_ORDERING: &[&str] = &[
    "call to order",
    "call us to order",
    "order by phone",
    "phone orders",
    "phone in your order",
    "fax your order",
    "fax orders",
    "order by fax",
    "order form",
    "fax:",
];

const CHAT_MARKERS: &[&str] = &[
    "intercom",
    "drift.com",
    "livechat",
    "live chat",
    "chat with us",
    "zendesk",
    "zopim",
    "tawk.to",
    "olark",
    "hs-scripts.com",
    "tidio",
];

const REP_HIRING: &[&str] = &[
    "join our sales team",
    "now hiring sales",
    "hiring sales",
    "outside sales representative",
    "inside sales representative",
    "sales rep opening",
    "territory sales manager position",
];

/// Revenue depends on reps the buyer has to reach by phone or locator.
pub struct RepPerformanceHeuristic;

impl CategoryHeuristic for RepPerformanceHeuristic {
    fn category(&self) -> PainCategory {
        PainCategory::RepPerformanceCrisis
    }

    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure> {
        input.readable(&[PageRole::Home, PageRole::Pricing])?;
        let mut acc = EvidenceAccumulator::new(self.category());
        if !input.has_home() {
            return Ok(acc.finish());
        }

        let text = input.joined_text(&[PageRole::Home, PageRole::Pricing]);

        if let Some(phrase) = first_match(&text, REP_LOCATOR) {
            acc.add(
                "rep_locator_dependency",
                0.30,
                format!("Buyers sent to a rep (\"{phrase}\")"),
            );
        }

        if let Some(phrase) = first_match(&text, PHONE_FAX_ORDERING) {
            acc.add(
                "phone_fax_ordering",
                0.30,
                format!("Orders taken by phone or fax (\"{phrase}\")"),
            );
        }

        if first_match(input.markup(PageRole::Home), CHAT_MARKERS).is_none() {
            acc.add("no_live_chat", 0.15, "No live chat on the home page");
        }

        if let Some(phrase) = first_match(&text, REP_HIRING) {
            acc.add(
                "rep_hiring",
                0.20,
                format!("Actively hiring sales reps (\"{phrase}\")"),
            );
        }

        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::fixtures::{home, org, CLEAN_HOME, REFERENCE_YEAR};

    fn evaluate(html: &str) -> Evidence {
        let org = org();
        let pages = home(html);
        let input = ExtractionInput::new(&org, &pages, REFERENCE_YEAR);
        RepPerformanceHeuristic.evaluate(&input).unwrap()
    }

    #[test]
    fn chat_enabled_self_serve_site_scores_zero() {
        assert_eq!(evaluate(CLEAN_HOME).score, 0.0);
    }

    #[test]
    fn rep_dependent_site_scores_strong() {
        let evidence = evaluate(
            "<p>Find a rep in your territory.</p>
             <p>Call to order: 800-555-0100. Fax: 800-555-0101</p>
             <p>Careers: join our sales team!</p>",
        );
        let codes: Vec<&str> = evidence.indicators_found.iter().map(String::as_str).collect();
        assert_eq!(
            codes,
            vec![
                "no_live_chat",
                "phone_fax_ordering",
                "rep_hiring",
                "rep_locator_dependency",
            ]
        );
        assert!((evidence.score - 0.95).abs() < 1e-9);
        assert_eq!(
            evidence.specific_findings[0],
            "Buyers sent to a rep (\"find a rep\")"
        );
    }

    #[test]
    fn only_missing_chat_is_weak() {
        let evidence = evaluate("<p>Welcome to Acme.</p>");
        assert!((evidence.score - 0.15).abs() < 1e-9);
        assert_eq!(
            evidence.evidence_strength,
            crate::evidence::EvidenceStrength::Weak
        );
    }
}
