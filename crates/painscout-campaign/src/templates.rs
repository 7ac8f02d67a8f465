//! Static outreach copy, one template per pain category.
//!
//! Placeholders: `{company}`, `{domain}`, `{finding}`, `{persona}`, `{quote}`.
//! Unknown `{...}` tokens are left as written.

use painscout_core::PainCategory;

#[derive(Debug)]
pub struct EmailTemplate {
    pub day_offset: u16,
    pub subject: &'static str,
    pub body: &'static str,
}

#[derive(Debug)]
pub struct LinkedInTemplate {
    pub day_offset: u16,
    pub message: &'static str,
}

#[derive(Debug)]
pub struct CategoryTemplate {
    pub strategy: &'static str,
    /// Customer-validated statement dropped into `{quote}`.
    pub quote: &'static str,
    pub emails: [EmailTemplate; 3],
    pub linkedin: [LinkedInTemplate; 2],
}

static SALES_ENABLEMENT: CategoryTemplate = CategoryTemplate {
    strategy: "self_serve_buying",
    quote: "Our buyers stopped waiting three days for a quote the week we put prices online.",
    emails: [
        EmailTemplate {
            day_offset: 0,
            subject: "How {company} buyers find a price",
            body: "Hi {persona},\n\nWhile looking at {domain} I noticed: {finding}. \
                   Distributors in your space tell us the same thing: \"{quote}\"\n\n\
                   Worth 20 minutes to compare notes on self-serve ordering?",
        },
        EmailTemplate {
            day_offset: 3,
            subject: "Re: How {company} buyers find a price",
            body: "Hi {persona},\n\nFollowing up. Every quote request that sits in an inbox \
                   is an order a competitor can take. Happy to share what a priced, searchable \
                   catalog did for teams like {company}'s.",
        },
        EmailTemplate {
            day_offset: 7,
            subject: "Closing the loop on {domain}",
            body: "Hi {persona},\n\nLast note from me. If buyer self-service makes the list \
                   this year, I can send a one-page teardown of {domain}. Just reply \"send it\".",
        },
    ],
    linkedin: [
        LinkedInTemplate {
            day_offset: 1,
            message: "Hi {persona}, I work with distributors moving from quote requests to \
                      self-serve pricing. Would love to connect.",
        },
        LinkedInTemplate {
            day_offset: 5,
            message: "One line a sales leader shared with us: \"{quote}\" Curious whether that \
                      rings true at {company}.",
        },
    ],
};

static TECHNOLOGY: CategoryTemplate = CategoryTemplate {
    strategy: "platform_consolidation",
    quote: "We had four logins for four systems, and our customers had to learn all of them.",
    emails: [
        EmailTemplate {
            day_offset: 0,
            subject: "{company}'s customer logins",
            body: "Hi {persona},\n\nA quick observation from {domain}: {finding}. An IT lead at \
                   a similar manufacturer put it this way: \"{quote}\"\n\n\
                   Open to a short call on consolidating the customer-facing stack?",
        },
        EmailTemplate {
            day_offset: 3,
            subject: "Re: {company}'s customer logins",
            body: "Hi {persona},\n\nCircling back. Each legacy portal is one more thing to patch, \
                   host and support. I can walk through how peers retired theirs without a big-bang \
                   migration.",
        },
        EmailTemplate {
            day_offset: 7,
            subject: "Last note on {domain}",
            body: "Hi {persona},\n\nI'll leave it here. If platform consolidation comes up in \
                   planning, I have a short write-up on {domain} I'm happy to send.",
        },
    ],
    linkedin: [
        LinkedInTemplate {
            day_offset: 1,
            message: "Hi {persona}, I help manufacturers untangle legacy customer portals. \
                      Would be glad to connect.",
        },
        LinkedInTemplate {
            day_offset: 5,
            message: "Saw {finding} on {domain}. Is consolidation on your roadmap?",
        },
    ],
};

static REP_PERFORMANCE: CategoryTemplate = CategoryTemplate {
    strategy: "rep_productivity",
    quote: "Half of what our reps did all day was read prices off a PDF over the phone.",
    emails: [
        EmailTemplate {
            day_offset: 0,
            subject: "Rep time at {company}",
            body: "Hi {persona},\n\nOn {domain} I noticed: {finding}. A sales VP we work with \
                   told us: \"{quote}\"\n\nWorth a conversation about giving that time back to \
                   selling?",
        },
        EmailTemplate {
            day_offset: 3,
            subject: "Re: Rep time at {company}",
            body: "Hi {persona},\n\nFollowing up. When routine reorders move online, reps stop \
                   being order takers. Happy to share numbers from teams the size of {company}'s.",
        },
        EmailTemplate {
            day_offset: 7,
            subject: "Closing the loop",
            body: "Hi {persona},\n\nLast one from me. If rep productivity is a priority this \
                   year, reply and I'll send a short breakdown for {domain}.",
        },
    ],
    linkedin: [
        LinkedInTemplate {
            day_offset: 1,
            message: "Hi {persona}, I work with sales leaders whose reps spend their day taking \
                      phone orders. Would love to connect.",
        },
        LinkedInTemplate {
            day_offset: 5,
            message: "\"{quote}\" Does that sound familiar at {company}?",
        },
    ],
};

static SKU_COMPLEXITY: CategoryTemplate = CategoryTemplate {
    strategy: "catalog_findability",
    quote: "Customers knew the part they wanted. They just couldn't find it on our site.",
    emails: [
        EmailTemplate {
            day_offset: 0,
            subject: "Finding a part on {domain}",
            body: "Hi {persona},\n\nLooking at {domain}: {finding}. An operations lead at a \
                   distributor with a similar catalog said: \"{quote}\"\n\n\
                   Open to comparing approaches to catalog search and product data?",
        },
        EmailTemplate {
            day_offset: 3,
            subject: "Re: Finding a part on {domain}",
            body: "Hi {persona},\n\nFollowing up. Large catalogs usually break at search and \
                   attributes first. I can share how peers structured theirs.",
        },
        EmailTemplate {
            day_offset: 7,
            subject: "Last note for {company}",
            body: "Hi {persona},\n\nI'll close the loop here. Reply any time if catalog \
                   findability moves up the list.",
        },
    ],
    linkedin: [
        LinkedInTemplate {
            day_offset: 1,
            message: "Hi {persona}, I work with teams managing very large product catalogs. \
                      Would be glad to connect.",
        },
        LinkedInTemplate {
            day_offset: 5,
            message: "Noticed {finding} on {domain}. How are you handling product search today?",
        },
    ],
};

static CHANNEL_CONFLICT: CategoryTemplate = CategoryTemplate {
    strategy: "channel_alignment",
    quote: "Our dealers were competing with our own website, and nobody owned the customer.",
    emails: [
        EmailTemplate {
            day_offset: 0,
            subject: "Channels at {company}",
            body: "Hi {persona},\n\nFrom {domain}: {finding}. A channel chief we work with \
                   described it as: \"{quote}\"\n\nWorth a call on aligning direct and dealer \
                   pricing?",
        },
        EmailTemplate {
            day_offset: 3,
            subject: "Re: Channels at {company}",
            body: "Hi {persona},\n\nFollowing up. Channel conflict shows up first as margin \
                   leakage. Happy to share how others split online and dealer demand.",
        },
        EmailTemplate {
            day_offset: 7,
            subject: "Closing the loop on {domain}",
            body: "Hi {persona},\n\nLast note. If channel strategy is on the agenda this \
                   year, I can send a one-pager on {company}.",
        },
    ],
    linkedin: [
        LinkedInTemplate {
            day_offset: 1,
            message: "Hi {persona}, I work with manufacturers balancing direct and dealer \
                      channels. Would love to connect.",
        },
        LinkedInTemplate {
            day_offset: 5,
            message: "\"{quote}\" Curious how {company} manages it.",
        },
    ],
};

#[must_use]
pub fn template_for(category: PainCategory) -> &'static CategoryTemplate {
    match category {
        PainCategory::SalesEnablementCollapse => &SALES_ENABLEMENT,
        PainCategory::TechnologyObsolescence => &TECHNOLOGY,
        PainCategory::RepPerformanceCrisis => &REP_PERFORMANCE,
        PainCategory::SkuComplexity => &SKU_COMPLEXITY,
        PainCategory::ChannelConflict => &CHANNEL_CONFLICT,
    }
}

/// Values substituted into template placeholders.
#[derive(Debug)]
pub(crate) struct Placeholders<'a> {
    pub company: &'a str,
    pub domain: &'a str,
    pub finding: &'a str,
    pub persona: &'a str,
    pub quote: &'a str,
}

impl Placeholders<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "company" => Some(self.company),
            "domain" => Some(self.domain),
            "finding" => Some(self.finding),
            "persona" => Some(self.persona),
            "quote" => Some(self.quote),
            _ => None,
        }
    }
}

/// Single-pass substitution; substituted values are never re-scanned.
pub(crate) fn render(template: &str, values: &Placeholders<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match values.lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [&str; 5] = ["company", "domain", "finding", "persona", "quote"];

    fn values() -> Placeholders<'static> {
        Placeholders {
            company: "Acme",
            domain: "acme.com",
            finding: "No visible prices",
            persona: "VP of Sales",
            quote: "q",
        }
    }

    fn placeholders_in(text: &str) -> Vec<&str> {
        text.split('{')
            .skip(1)
            .filter_map(|s| s.split_once('}').map(|(k, _)| k))
            .collect()
    }

    #[test]
    fn every_template_has_fixed_cadence() {
        for category in PainCategory::ALL {
            let template = template_for(category);
            let email_days: Vec<u16> = template.emails.iter().map(|e| e.day_offset).collect();
            let linkedin_days: Vec<u16> = template.linkedin.iter().map(|m| m.day_offset).collect();
            assert_eq!(email_days, vec![0, 3, 7], "{category}");
            assert_eq!(linkedin_days, vec![1, 5], "{category}");
        }
    }

    #[test]
    fn templates_only_use_known_placeholders() {
        for category in PainCategory::ALL {
            let template = template_for(category);
            let texts = template
                .emails
                .iter()
                .flat_map(|e| [e.subject, e.body])
                .chain(template.linkedin.iter().map(|m| m.message));
            for text in texts {
                for key in placeholders_in(text) {
                    assert!(KNOWN.contains(&key), "{category}: unknown placeholder {{{key}}}");
                }
            }
        }
    }

    #[test]
    fn render_substitutes_each_placeholder() {
        assert_eq!(
            render("Hi {persona}, about {company} ({domain}): {finding}. \"{quote}\"", &values()),
            "Hi VP of Sales, about Acme (acme.com): No visible prices. \"q\""
        );
    }

    #[test]
    fn render_does_not_rescan_substituted_values() {
        let values = Placeholders {
            company: "{finding}",
            ..values()
        };
        assert_eq!(render("{company}", &values), "{finding}");
    }

    #[test]
    fn render_keeps_unknown_and_unclosed_tokens() {
        assert_eq!(render("{nope} and {company", &values()), "{nope} and {company");
    }
}
