//! Day-level rows and the in-memory dataset handed to the core.
//!
//! RULE: The dataset is read-only. Every simulation run works on its
//! own cloned rows, so per-run mutation (scenario adjustments, lag
//! updates) never leaks back into the source data or across runs.

use crate::error::ForecastResult;
use crate::types::ProductName;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar day of the simulated month for one product.
///
/// Numeric attributes live in `columns`, keyed by the names in
/// [`crate::schema::columns`] plus any one-hot indicator columns the
/// dataset carries. A missing key means the attribute is unknown for
/// this row; the core never stores NaN.
///
/// Invariant: within one product's series, dates are unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayRow {
    pub product: ProductName,
    pub date: NaiveDate,
    #[serde(default)]
    pub columns: BTreeMap<String, f64>,
}

impl DayRow {
    pub fn new(product: impl Into<ProductName>, date: NaiveDate) -> Self {
        Self {
            product: product.into(),
            date,
            columns: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns.get(name).copied()
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.columns.insert(name.to_string(), value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Builder-style column set, for tests and dataset construction.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }
}

/// Sort rows into strictly ascending date order. The forecaster
/// requires this before any lag feature is meaningful.
pub fn sort_by_date(rows: &mut [DayRow]) {
    rows.sort_by_key(|row| row.date);
}

/// The day-level dataset for all products, already resident in
/// memory. Produced by the external ETL; the core never loads files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<DayRow>,
}

impl Dataset {
    pub fn new(rows: Vec<DayRow>) -> Self {
        Self { rows }
    }

    pub fn from_json(json: &str) -> ForecastResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sorted distinct product names, for selection UIs.
    pub fn products(&self) -> Vec<ProductName> {
        let mut names: Vec<ProductName> =
            self.rows.iter().map(|row| row.product.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Cloned rows for one product, date-sorted. Cloning is the
    /// ownership boundary: callers mutate freely.
    pub fn rows_for_product(&self, product: &str) -> Vec<DayRow> {
        let mut rows: Vec<DayRow> = self
            .rows
            .iter()
            .filter(|row| row.product == product)
            .cloned()
            .collect();
        sort_by_date(&mut rows);
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
