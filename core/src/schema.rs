//! Feature schema — the ordered column set the trained model requires,
//! plus the column-naming conventions of the day-level dataset.
//!
//! RULE: The feature set is read from the model once, at load time,
//! and is immutable for the lifetime of a simulation run. Which column
//! families are one-hot encoded is model-specific, so it travels here
//! as configuration data, never as hardcoded prefix checks elsewhere.

use crate::error::{ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known column names on day rows. The dataset provider and the
/// trained model both follow this convention.
pub mod columns {
    pub const DAY_OF_MONTH: &str = "day_of_month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const BASE_PRICE: &str = "base_price";
    pub const SELLING_PRICE: &str = "selling_price";
    pub const COMPETITOR_PRICE: &str = "competitor_price";
    pub const DISCOUNT_PCT: &str = "discount_pct";
    pub const PRICE_RATIO: &str = "price_ratio";
    /// Historical target. Optional on future rows; used only for the
    /// forecaster's fallback policy.
    pub const UNITS_SOLD: &str = "units_sold";
    pub const UNITS_MA7: &str = "units_sold_ma7";
    /// Derived column attached to every row once a run completes.
    pub const PREDICTED_UNITS: &str = "predicted_units";

    /// Name of the lag column at distance `d` (1..=7).
    pub fn lag(d: usize) -> String {
        format!("units_sold_lag{d}")
    }
}

/// Column-naming conventions that vary per trained model: which name
/// prefixes mark one-hot indicator families, and which named
/// per-competitor price columns the dataset carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureFamilies {
    #[serde(default = "FeatureFamilies::default_one_hot_prefixes")]
    pub one_hot_prefixes: Vec<String>,
    #[serde(default)]
    pub competitor_columns: Vec<String>,
}

impl FeatureFamilies {
    fn default_one_hot_prefixes() -> Vec<String> {
        vec![
            "product_".to_string(),
            "category_".to_string(),
            "subcategory_".to_string(),
        ]
    }
}

impl Default for FeatureFamilies {
    fn default() -> Self {
        Self {
            one_hot_prefixes: Self::default_one_hot_prefixes(),
            competitor_columns: Vec::new(),
        }
    }
}

/// How a required column defaults when a row lacks it. Both classes
/// default to 0.0; the distinction is kept explicit because the model
/// was trained expecting absent one-hot categories to read as false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// Absent one-hot indicator: category not present.
    OneHot,
    /// Numeric baseline.
    Numeric,
}

impl ColumnDefault {
    pub fn value(self) -> f64 {
        0.0
    }
}

/// The immutable required-feature schema for one loaded model.
///
/// Defaults for every required column are enumerated up front in a
/// lookup table, so resolution is a total function over the schema
/// rather than a per-call prefix scan.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    feature_names: Vec<String>,
    families: FeatureFamilies,
    defaults: BTreeMap<String, ColumnDefault>,
}

impl FeatureSchema {
    pub fn new(feature_names: Vec<String>, families: FeatureFamilies) -> ForecastResult<Self> {
        if feature_names.is_empty() {
            return Err(ForecastError::EmptyFeatureSet);
        }

        let defaults = feature_names
            .iter()
            .map(|name| {
                let class = if families
                    .one_hot_prefixes
                    .iter()
                    .any(|prefix| name.starts_with(prefix.as_str()))
                {
                    ColumnDefault::OneHot
                } else {
                    ColumnDefault::Numeric
                };
                (name.clone(), class)
            })
            .collect();

        Ok(Self {
            feature_names,
            families,
            defaults,
        })
    }

    /// Required column names, in the exact order the model expects.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn families(&self) -> &FeatureFamilies {
        &self.families
    }

    pub fn competitor_columns(&self) -> &[String] {
        &self.families.competitor_columns
    }

    /// Default value for a required column absent from a row.
    /// Total over the schema's feature set.
    pub fn default_for(&self, name: &str) -> f64 {
        self.defaults
            .get(name)
            .copied()
            .unwrap_or(ColumnDefault::Numeric)
            .value()
    }

    pub fn default_class(&self, name: &str) -> Option<ColumnDefault> {
        self.defaults.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_prefixes_classify_defaults() {
        let schema = FeatureSchema::new(
            vec!["product_widget".into(), "selling_price".into()],
            FeatureFamilies::default(),
        )
        .unwrap();

        assert_eq!(
            schema.default_class("product_widget"),
            Some(ColumnDefault::OneHot)
        );
        assert_eq!(
            schema.default_class("selling_price"),
            Some(ColumnDefault::Numeric)
        );
    }

    #[test]
    fn empty_feature_set_is_rejected() {
        let err = FeatureSchema::new(Vec::new(), FeatureFamilies::default());
        assert!(matches!(err, Err(ForecastError::EmptyFeatureSet)));
    }
}
