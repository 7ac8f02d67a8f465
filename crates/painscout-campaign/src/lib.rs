//! Persona-targeted outreach campaigns for qualified organizations.

pub mod composer;
pub mod persona;
pub mod templates;

pub use composer::{
    campaign_id, Campaign, CampaignComposer, CampaignStatus, ComposeError, EmailStep, LinkedInStep,
};
pub use persona::Persona;
pub use templates::{template_for, CategoryTemplate, EmailTemplate, LinkedInTemplate};
