//! Builds a [`Campaign`] from an organization and its pain profile.

use painscout_analysis::{EvidenceStrength, PainProfile, Tier, Urgency};
use painscout_core::{Organization, PainCategory};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::persona::Persona;
use crate::templates::{render, template_for, Placeholders};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// The caller must check qualification before composing.
    #[error(
        "{organization} does not qualify for a campaign (PSI {psi_score}, tier {tier}, evidence {strength})"
    )]
    NotQualified {
        organization: String,
        psi_score: u8,
        tier: Tier,
        strength: EvidenceStrength,
    },
}

/// Delivery state of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Composed, not yet accepted by an outreach sink.
    Draft,
    /// Accepted by the outreach sink, waiting to go out.
    Ready,
    Dispatched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailStep {
    pub day_offset: u16,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInStep {
    pub day_offset: u16,
    pub message: String,
}

/// Outreach plan for one qualified organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub organization_id: String,
    pub company_name: String,
    pub domain: String,
    pub primary_pain: PainCategory,
    pub target_persona: Persona,
    pub backup_persona: Persona,
    pub email_sequence: Vec<EmailStep>,
    pub linkedin_sequence: Vec<LinkedInStep>,
    pub urgency_level: Urgency,
    pub strategy: String,
    pub status: CampaignStatus,
}

impl Campaign {
    /// Email plus LinkedIn steps.
    #[must_use]
    pub fn outreach_units(&self) -> usize {
        self.email_sequence.len() + self.linkedin_sequence.len()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == CampaignStatus::Ready
    }
}

/// `sha256("{domain}|{category}")`, hex, first 16 characters.
#[must_use]
pub fn campaign_id(domain: &str, primary_pain: PainCategory) -> String {
    let digest = format!(
        "{:x}",
        Sha256::digest(format!("{domain}|{}", primary_pain.as_str()).as_bytes())
    );
    digest[..16].to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignComposer;

impl CampaignComposer {
    /// Compose a campaign for a profile that qualifies.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::NotQualified`] when the profile is tier C or its
    /// evidence is weaker than moderate.
    pub fn compose(
        &self,
        organization: &Organization,
        profile: &PainProfile,
    ) -> Result<Campaign, ComposeError> {
        if profile.tier == Tier::C || profile.evidence_strength < EvidenceStrength::Moderate {
            return Err(ComposeError::NotQualified {
                organization: organization.domain.clone(),
                psi_score: profile.psi_score,
                tier: profile.tier,
                strength: profile.evidence_strength,
            });
        }

        let category = profile.primary_pain;
        let template = template_for(category);
        let target = Persona::for_category(category);
        let fallback_finding = format!("signs of {}", category.label());
        let values = Placeholders {
            company: &organization.company_name,
            domain: &organization.domain,
            finding: profile
                .key_findings
                .first()
                .map_or(fallback_finding.as_str(), String::as_str),
            persona: target.title(),
            quote: template.quote,
        };

        let email_sequence = template
            .emails
            .iter()
            .map(|e| EmailStep {
                day_offset: e.day_offset,
                subject: render(e.subject, &values),
                body: render(e.body, &values),
            })
            .collect();
        let linkedin_sequence = template
            .linkedin
            .iter()
            .map(|m| LinkedInStep {
                day_offset: m.day_offset,
                message: render(m.message, &values),
            })
            .collect();

        let campaign = Campaign {
            campaign_id: campaign_id(&organization.domain, category),
            organization_id: organization.id.clone(),
            company_name: organization.company_name.clone(),
            domain: organization.domain.clone(),
            primary_pain: category,
            target_persona: target,
            backup_persona: target.backup(),
            email_sequence,
            linkedin_sequence,
            urgency_level: profile.urgency,
            strategy: template.strategy.to_string(),
            status: CampaignStatus::Draft,
        };

        tracing::debug!(
            organization = %organization.domain,
            campaign_id = %campaign.campaign_id,
            persona = %campaign.target_persona,
            strategy = %campaign.strategy,
            "campaign composed"
        );
        Ok(campaign)
    }
}
