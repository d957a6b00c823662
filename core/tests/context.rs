use chrono::NaiveDate;
use forecast_core::context::SimContext;
use forecast_core::error::ForecastError;
use forecast_core::predictor::Predictor;
use forecast_core::scenario::{CompetitorScenario, ScenarioParams};
use forecast_core::schema::{columns, FeatureFamilies};
use forecast_core::skeleton::{Dataset, DayRow};
use std::sync::Arc;

fn nov(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, day).unwrap()
}

struct Five {
    names: Vec<String>,
}

impl Five {
    fn new() -> Self {
        Self {
            names: vec![
                columns::SELLING_PRICE.to_string(),
                columns::lag(1),
                columns::UNITS_MA7.to_string(),
            ],
        }
    }
}

impl Predictor for Five {
    fn declared_feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, _features: &[f64]) -> anyhow::Result<f64> {
        Ok(5.0)
    }
}

fn two_product_dataset() -> Dataset {
    let mut rows = Vec::new();
    for product in ["Widget", "Anvil"] {
        for day in 1..=5 {
            rows.push(
                DayRow::new(product, nov(day))
                    .with(columns::BASE_PRICE, 100.0)
                    .with(columns::SELLING_PRICE, 100.0),
            );
        }
    }
    Dataset::new(rows)
}

fn context() -> SimContext {
    SimContext::new(
        Arc::new(Five::new()),
        two_product_dataset(),
        FeatureFamilies::default(),
    )
    .unwrap()
}

#[test]
fn products_are_sorted_and_distinct() {
    assert_eq!(context().products(), vec!["Anvil", "Widget"]);
}

#[test]
fn unknown_product_is_a_distinct_fatal_error() {
    let params = ScenarioParams::new(0.0, CompetitorScenario::Actual).unwrap();
    let err = context().simulate("Doohickey", &params);
    assert!(matches!(
        err,
        Err(ForecastError::EmptyProductSelection { product }) if product == "Doohickey"
    ));
}

#[test]
fn outcome_carries_series_and_metrics() {
    let params = ScenarioParams::new(20.0, CompetitorScenario::Actual).unwrap();
    let outcome = context().simulate("Widget", &params).unwrap();

    assert_eq!(outcome.product, "Widget");
    assert_eq!(outcome.series.len(), 5);
    assert_eq!(outcome.metrics.total_units, 25.0);
    // Discounted price 80, five days of five units.
    assert_eq!(outcome.metrics.total_revenue, 25.0 * 80.0);
    assert_eq!(outcome.metrics.avg_price, 80.0);
}

#[test]
fn dataset_round_trips_through_json() {
    let json = serde_json::to_string(&two_product_dataset()).unwrap();
    let loaded = Dataset::from_json(&json).unwrap();
    assert_eq!(loaded.products(), vec!["Anvil", "Widget"]);
    assert_eq!(loaded.len(), 10);
}
