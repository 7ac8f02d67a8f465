//! The fixed pain-category enumeration and a table keyed by it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One of the fixed evidence/decision-point categories.
///
/// Declaration order is significant: it is the tie-break order whenever two
/// categories score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainCategory {
    SalesEnablementCollapse,
    TechnologyObsolescence,
    RepPerformanceCrisis,
    SkuComplexity,
    ChannelConflict,
}

impl PainCategory {
    pub const COUNT: usize = 5;

    /// Every category in declaration order.
    pub const ALL: [PainCategory; Self::COUNT] = [
        PainCategory::SalesEnablementCollapse,
        PainCategory::TechnologyObsolescence,
        PainCategory::RepPerformanceCrisis,
        PainCategory::SkuComplexity,
        PainCategory::ChannelConflict,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PainCategory::SalesEnablementCollapse => "sales_enablement_collapse",
            PainCategory::TechnologyObsolescence => "technology_obsolescence",
            PainCategory::RepPerformanceCrisis => "rep_performance_crisis",
            PainCategory::SkuComplexity => "sku_complexity",
            PainCategory::ChannelConflict => "channel_conflict",
        }
    }

    /// Human-readable label used in findings and outreach copy.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PainCategory::SalesEnablementCollapse => "sales enablement collapse",
            PainCategory::TechnologyObsolescence => "technology obsolescence",
            PainCategory::RepPerformanceCrisis => "rep performance crisis",
            PainCategory::SkuComplexity => "SKU complexity",
            PainCategory::ChannelConflict => "channel conflict",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PainCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PainCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}

/// A value for every [`PainCategory`], stored in declaration order.
///
/// Because the backing array has exactly [`PainCategory::COUNT`] slots, a table
/// cannot omit or duplicate a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable<T>([T; PainCategory::COUNT]);

impl<T> CategoryTable<T> {
    pub fn from_fn(mut f: impl FnMut(PainCategory) -> T) -> Self {
        Self(std::array::from_fn(|i| f(PainCategory::ALL[i])))
    }

    #[must_use]
    pub fn get(&self, category: PainCategory) -> &T {
        &self.0[category.index()]
    }

    pub fn get_mut(&mut self, category: PainCategory) -> &mut T {
        &mut self.0[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PainCategory, &T)> {
        PainCategory::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(PainCategory, &T) -> U) -> CategoryTable<U> {
        CategoryTable::from_fn(|c| f(c, self.get(c)))
    }
}

impl<T: Default> Default for CategoryTable<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T: Serialize> Serialize for CategoryTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PainCategory::COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoryTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = BTreeMap::<PainCategory, T>::deserialize(deserializer)?;
        let mut values = Vec::with_capacity(PainCategory::COUNT);
        for category in PainCategory::ALL {
            match map.remove(&category) {
                Some(value) => values.push(value),
                None => {
                    return Err(de::Error::custom(format!(
                        "missing pain category `{category}`"
                    )))
                }
            }
        }
        let slots: [T; PainCategory::COUNT] = values
            .try_into()
            .map_err(|_| de::Error::custom("category table length mismatch"))?;
        Ok(Self(slots))
    }
}
