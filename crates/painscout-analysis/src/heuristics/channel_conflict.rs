use painscout_core::pages::host_of;
use painscout_core::{PageRole, PainCategory};

use super::{first_match, CategoryHeuristic, ExtractionInput};
use crate::error::ExtractionFailure;
use crate::evidence::{Evidence, EvidenceAccumulator};

const MULTI_CHANNEL: u32 = 3;

const DEALER_ROUTING: &[&str] = &[
    "where to buy",
    "find a dealer",
    "dealer locator",
    "find a distributor",
    "authorized dealer",
    "find a retailer",
    "store locator",
];

const DIRECT_SELLING: &[&str] = &[
    "add to cart",
    "buy now",
    "shop now",
    "checkout",
    "order online",
];

const MARKETPLACE_HOSTS: &[&str] = &["amazon.", "ebay.", "walmart.", "alibaba.", "etsy."];

const MARKETPLACE_WORDS: &[&str] = &[
    "available on amazon",
    "shop on amazon",
    "buy on amazon",
    "amazon storefront",
    "find us on ebay",
];

const DISTRIBUTOR_PROGRAM: &[&str] = &[
    "become a dealer",
    "become a distributor",
    "dealer program",
    "distributor program",
    "reseller program",
    "dealer application",
];

/// Direct, dealer and marketplace channels competing for the same buyer.
pub struct ChannelConflictHeuristic;

impl CategoryHeuristic for ChannelConflictHeuristic {
    fn category(&self) -> PainCategory {
        PainCategory::ChannelConflict
    }

    fn evaluate(&self, input: &ExtractionInput<'_>) -> Result<Evidence, ExtractionFailure> {
        input.readable(&[PageRole::Home])?;
        let mut acc = EvidenceAccumulator::new(self.category());
        let text = input.text(PageRole::Home);

        if let Some(channels) = input
            .organization
            .channel_count
            .filter(|&c| c >= MULTI_CHANNEL)
        {
            acc.add(
                "multi_channel",
                0.35,
                format!("Sells through {channels} channels"),
            );
        }

        if let (Some(direct), Some(dealer)) = (
            first_match(text, DIRECT_SELLING),
            first_match(text, DEALER_ROUTING),
        ) {
            acc.add(
                "direct_vs_dealer",
                0.40,
                format!("Sells direct (\"{direct}\") while routing buyers to dealers (\"{dealer}\")"),
            );
        }

        let marketplace = input
            .home_links()
            .iter()
            .filter_map(|l| host_of(&l.url))
            .find(|host| MARKETPLACE_HOSTS.iter().any(|m| host.contains(m)))
            .or_else(|| first_match(text, MARKETPLACE_WORDS).map(str::to_string));
        if let Some(marketplace) = marketplace {
            acc.add(
                "marketplace_presence",
                0.20,
                format!("Also sells through a marketplace ({marketplace})"),
            );
        }

        if let Some(phrase) = first_match(text, DISTRIBUTOR_PROGRAM) {
            acc.add(
                "distributor_program",
                0.15,
                format!("Recruits resellers (\"{phrase}\")"),
            );
        }

        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use painscout_core::FetchedPages;

    use super::*;
    use crate::evidence::EvidenceStrength;
    use crate::heuristics::fixtures::{home, org, CLEAN_HOME, REFERENCE_YEAR};

    fn evaluate_with(channels: Option<u32>, pages: &FetchedPages) -> Evidence {
        let mut org = org();
        org.channel_count = channels;
        let input = ExtractionInput::new(&org, pages, REFERENCE_YEAR);
        ChannelConflictHeuristic.evaluate(&input).unwrap()
    }

    #[test]
    fn single_channel_site_scores_zero() {
        assert_eq!(evaluate_with(Some(1), &home(CLEAN_HOME)).score, 0.0);
    }

    #[test]
    fn every_channel_signal_caps_at_one() {
        let pages = home(
            r#"<button>Add to cart</button>
            <a href="/dealers">Find a dealer</a>
            <a href="https://www.amazon.com/stores/acme">Amazon store</a>
            <a href="/partners">Become a distributor</a>"#,
        );
        let evidence = evaluate_with(Some(4), &pages);
        assert_eq!(evidence.indicators_found.len(), 4);
        assert!((evidence.score - 1.0).abs() < 1e-9);
        assert_eq!(evidence.evidence_strength, EvidenceStrength::Strong);
        assert!(evidence
            .specific_findings
            .contains(&"Also sells through a marketplace (amazon.com)".to_string()));
    }

    #[test]
    fn dealer_routing_alone_is_not_conflict() {
        let evidence = evaluate_with(None, &home("<a href=\"/dealers\">Where to buy</a>"));
        assert_eq!(evidence.score, 0.0);
    }

    #[test]
    fn channel_metadata_counts_without_pages() {
        let evidence = evaluate_with(Some(3), &FetchedPages::default());
        assert!((evidence.score - 0.35).abs() < 1e-9);
        assert_eq!(evidence.specific_findings, vec!["Sells through 3 channels"]);
    }
}
