//! Metrics aggregator — KPI reduction over a finished run.
//!
//! Pure and reactive: observes a `Completed` prediction series,
//! computes sums and means, changes nothing.

use crate::forecaster::PredictionSeries;
use crate::schema::columns;
use serde::{Deserialize, Serialize};

/// Summary KPIs for one scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub total_units: f64,
    pub total_revenue: f64,
    pub avg_price: f64,
    pub avg_discount: f64,
}

/// Reduce a prediction series into its KPIs.
///
/// Defined for non-empty series only; passing an empty one is a
/// caller bug.
pub fn aggregate(series: &PredictionSeries) -> ScenarioMetrics {
    debug_assert!(!series.is_empty(), "aggregate() on empty series");

    let total_units: f64 = series.predictions.iter().sum();

    let total_revenue: f64 = series
        .days()
        .map(|(row, predicted)| predicted * row.get(columns::SELLING_PRICE).unwrap_or(0.0))
        .sum();

    let avg_price = column_mean(series, columns::SELLING_PRICE);
    let avg_discount = column_mean(series, columns::DISCOUNT_PCT);

    ScenarioMetrics {
        total_units,
        total_revenue,
        avg_price,
        avg_discount,
    }
}

/// Mean of a column over the rows that carry it; 0.0 when absent
/// everywhere.
fn column_mean(series: &PredictionSeries, column: &str) -> f64 {
    let values: Vec<f64> = series
        .rows
        .iter()
        .filter_map(|row| row.get(column))
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
