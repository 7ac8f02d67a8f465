//! Category weights for the Pain Signal Index.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use painscout_core::{CategoryTable, ConfigError, PainCategory};
use serde::Deserialize;

/// Allowed distance between the weight sum and 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

fn standard_weight(category: PainCategory) -> f64 {
    match category {
        PainCategory::SalesEnablementCollapse => 0.35,
        PainCategory::TechnologyObsolescence => 0.30,
        PainCategory::RepPerformanceCrisis => 0.20,
        PainCategory::SkuComplexity => 0.10,
        PainCategory::ChannelConflict => 0.05,
    }
}

/// One non-negative weight per category, summing to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable(CategoryTable<f64>);

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl WeightTable {
    /// 0.35 / 0.30 / 0.20 / 0.10 / 0.05 in declaration order.
    #[must_use]
    pub fn standard() -> Self {
        Self(CategoryTable::from_fn(standard_weight))
    }

    /// Build from explicit pairs. Every category must appear exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WeightTable`] on a duplicate or missing category,
    /// a negative or non-finite weight, or a sum off 1.0 by more than
    /// [`WEIGHT_TOLERANCE`].
    pub fn from_pairs(pairs: &[(PainCategory, f64)]) -> Result<Self, ConfigError> {
        let mut slots: CategoryTable<Option<f64>> = CategoryTable::default();
        for &(category, weight) in pairs {
            let slot = slots.get_mut(category);
            if slot.is_some() {
                return Err(ConfigError::WeightTable(format!(
                    "category {category} listed more than once"
                )));
            }
            *slot = Some(weight);
        }

        if let Some((missing, _)) = slots.iter().find(|(_, w)| w.is_none()) {
            return Err(ConfigError::WeightTable(format!(
                "category {missing} has no weight"
            )));
        }

        let table = Self(slots.map(|_, w| w.unwrap_or_default()));
        table.validate()?;
        Ok(table)
    }

    /// # Errors
    ///
    /// See [`WeightTable::from_pairs`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (category, &weight) in self.0.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::WeightTable(format!(
                    "weight for {category} must be a non-negative number, got {weight}"
                )));
            }
        }
        let sum: f64 = self.0.values().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightTable(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn weight(&self, category: PainCategory) -> f64 {
        *self.0.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PainCategory, f64)> + '_ {
        self.0.iter().map(|(c, &w)| (c, w))
    }
}

/// On-disk layout: `weights: { <category>: <weight>, ... }`.
#[derive(Debug, Deserialize)]
struct WeightsFile {
    weights: BTreeMap<String, f64>,
}

/// Load and validate a weight table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, names an
/// unknown category, or fails [`WeightTable::from_pairs`] validation.
pub fn load_weight_table(path: &Path) -> Result<WeightTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_weights(&content, &path.display().to_string())
}

/// Parse and validate a weight table from an in-memory YAML document.
///
/// # Errors
///
/// See [`load_weight_table`].
pub fn parse_weight_table(yaml: &str) -> Result<WeightTable, ConfigError> {
    parse_weights(yaml, "<inline>")
}

fn parse_weights(yaml: &str, origin: &str) -> Result<WeightTable, ConfigError> {
    let file: WeightsFile = serde_yaml::from_str(yaml).map_err(|e| ConfigError::YamlParse {
        path: origin.to_string(),
        source: e,
    })?;
    let pairs = file
        .weights
        .iter()
        .map(|(name, &weight)| Ok((PainCategory::from_str(name)?, weight)))
        .collect::<Result<Vec<_>, ConfigError>>()?;
    WeightTable::from_pairs(&pairs)
}
