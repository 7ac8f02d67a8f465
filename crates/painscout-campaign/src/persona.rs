use painscout_core::PainCategory;
use serde::{Deserialize, Serialize};

/// Who a campaign is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    SalesLeadership,
    ItOperations,
    CSuite,
}

impl Persona {
    /// Primary persona for a pain category.
    #[must_use]
    pub fn for_category(category: PainCategory) -> Self {
        match category {
            PainCategory::SalesEnablementCollapse
            | PainCategory::RepPerformanceCrisis
            | PainCategory::ChannelConflict => Persona::SalesLeadership,
            PainCategory::TechnologyObsolescence | PainCategory::SkuComplexity => {
                Persona::ItOperations
            }
        }
    }

    /// Fallback when the primary persona cannot be reached.
    #[must_use]
    pub fn backup(self) -> Self {
        match self {
            Persona::SalesLeadership | Persona::ItOperations => Persona::CSuite,
            Persona::CSuite => Persona::SalesLeadership,
        }
    }

    /// Title used in message copy.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Persona::SalesLeadership => "VP of Sales",
            Persona::ItOperations => "Director of IT",
            Persona::CSuite => "CEO",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Persona::SalesLeadership => write!(f, "sales_leadership"),
            Persona::ItOperations => write!(f, "it_operations"),
            Persona::CSuite => write!(f, "c_suite"),
        }
    }
}
