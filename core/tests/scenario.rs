use chrono::NaiveDate;
use forecast_core::error::ForecastError;
use forecast_core::scenario::{
    apply_competition, apply_discount, apply_scenario, CompetitorScenario, ScenarioParams,
};
use forecast_core::schema::{columns, FeatureFamilies, FeatureSchema};
use forecast_core::skeleton::DayRow;

fn nov(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, day).unwrap()
}

fn priced_row(day: u32) -> DayRow {
    DayRow::new("Widget", nov(day))
        .with(columns::BASE_PRICE, 100.0)
        .with(columns::SELLING_PRICE, 100.0)
        .with(columns::COMPETITOR_PRICE, 95.0)
        .with(columns::DISCOUNT_PCT, 0.0)
        .with(columns::PRICE_RATIO, 100.0 / 95.0)
}

#[test]
fn discount_formula_and_ratio_recomputation() {
    let rows = vec![priced_row(1)];
    let out = apply_discount(&rows, 20.0);

    let row = &out[0];
    assert_eq!(row.get(columns::SELLING_PRICE), Some(80.0));
    assert_eq!(row.get(columns::DISCOUNT_PCT), Some(20.0));
    assert_eq!(row.get(columns::PRICE_RATIO), Some(80.0 / 95.0));
    // Base price itself is untouched.
    assert_eq!(row.get(columns::BASE_PRICE), Some(100.0));
}

#[test]
fn discount_without_base_price_is_a_noop() {
    let rows = vec![DayRow::new("Widget", nov(1)).with(columns::SELLING_PRICE, 100.0)];
    let out = apply_discount(&rows, 20.0);
    assert_eq!(out, rows);
}

#[test]
fn discount_does_not_create_a_discount_column() {
    let rows = vec![DayRow::new("Widget", nov(1))
        .with(columns::BASE_PRICE, 100.0)
        .with(columns::SELLING_PRICE, 100.0)];
    let out = apply_discount(&rows, 10.0);

    assert_eq!(out[0].get(columns::SELLING_PRICE), Some(90.0));
    assert!(!out[0].has(columns::DISCOUNT_PCT));
    // No competitor price either, so no ratio appears.
    assert!(!out[0].has(columns::PRICE_RATIO));
}

#[test]
fn competition_at_zero_returns_input_unchanged() {
    let rows = vec![priced_row(1), priced_row(2)];
    let out = apply_competition(&rows, 0.0, &[]);
    assert_eq!(out, rows);
}

#[test]
fn competition_scales_prices_and_recomputes_ratio() {
    let rows = vec![priced_row(1)];
    let out = apply_competition(&rows, 5.0, &[]);

    let row = &out[0];
    let scaled = 95.0 * 1.05;
    assert_eq!(row.get(columns::COMPETITOR_PRICE), Some(scaled));
    assert_eq!(row.get(columns::PRICE_RATIO), Some(100.0 / scaled));
}

#[test]
fn competition_scales_named_competitor_columns() {
    let named = vec!["competitor_a_price".to_string(), "competitor_b_price".to_string()];
    let rows = vec![DayRow::new("Widget", nov(1))
        .with("competitor_a_price", 90.0)
        .with("competitor_b_price", 110.0)];

    let out = apply_competition(&rows, -5.0, &named);
    assert_eq!(out[0].get("competitor_a_price"), Some(90.0 * 0.95));
    assert_eq!(out[0].get("competitor_b_price"), Some(110.0 * 0.95));
    // No aggregate competitor price on the row: no ratio, no error.
    assert!(!out[0].has(columns::PRICE_RATIO));
}

#[test]
fn scenario_composes_discount_then_competition() {
    let schema = FeatureSchema::new(
        vec![columns::PRICE_RATIO.to_string()],
        FeatureFamilies::default(),
    )
    .unwrap();
    let params = ScenarioParams::new(20.0, CompetitorScenario::CompetitorsUp5).unwrap();

    let out = apply_scenario(&[priced_row(1)], &params, &schema);

    // The final ratio must use the discounted price over the scaled
    // competitor price: 80 / (95 * 1.05).
    let row = &out[0];
    assert_eq!(row.get(columns::SELLING_PRICE), Some(80.0));
    assert_eq!(row.get(columns::COMPETITOR_PRICE), Some(95.0 * 1.05));
    assert_eq!(row.get(columns::PRICE_RATIO), Some(80.0 / (95.0 * 1.05)));
}

#[test]
fn transforms_are_pure() {
    let rows = vec![priced_row(1)];
    let before = rows.clone();

    let _ = apply_discount(&rows, 35.0);
    let _ = apply_competition(&rows, 5.0, &[]);

    assert_eq!(rows, before);
}

#[test]
fn discount_outside_bounds_is_rejected() {
    let err = ScenarioParams::new(55.0, CompetitorScenario::Actual);
    assert!(matches!(
        err,
        Err(ForecastError::DiscountOutOfRange { value, .. }) if value == 55.0
    ));

    assert!(ScenarioParams::new(-50.0, CompetitorScenario::Actual).is_ok());
    assert!(ScenarioParams::new(50.0, CompetitorScenario::Actual).is_ok());
}
