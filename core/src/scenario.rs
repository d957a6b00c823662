//! Scenario transformer — pricing what-ifs applied to a day series.
//!
//! Two independent, pure operations: a discount on our own selling
//! price and a shift of competitor prices. The forecaster always
//! composes them discount-then-competition: the discount step's ratio
//! recomputation must see the unscaled competitor price, then the
//! competition step rescales the denominator.
//!
//! Missing columns degrade each adjustment to a no-op. Never an error.

use crate::error::{ForecastError, ForecastResult};
use crate::schema::columns;
use crate::schema::FeatureSchema;
use crate::skeleton::DayRow;
use serde::{Deserialize, Serialize};

pub const DISCOUNT_MIN_PCT: f64 = -50.0;
pub const DISCOUNT_MAX_PCT: f64 = 50.0;

/// The three supported competitor-price scenarios.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorScenario {
    CompetitorsDown5,
    Actual,
    CompetitorsUp5,
}

impl CompetitorScenario {
    pub const ALL: [CompetitorScenario; 3] = [
        CompetitorScenario::CompetitorsDown5,
        CompetitorScenario::Actual,
        CompetitorScenario::CompetitorsUp5,
    ];

    pub fn adjustment_pct(self) -> f64 {
        match self {
            Self::CompetitorsDown5 => -5.0,
            Self::Actual => 0.0,
            Self::CompetitorsUp5 => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CompetitorsDown5 => "competitors -5%",
            Self::Actual => "actual (0%)",
            Self::CompetitorsUp5 => "competitors +5%",
        }
    }
}

/// User-chosen simulation parameters. Immutable once a run starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioParams {
    pub discount_pct: f64,
    pub competitor: CompetitorScenario,
}

impl ScenarioParams {
    pub fn new(discount_pct: f64, competitor: CompetitorScenario) -> ForecastResult<Self> {
        if !(DISCOUNT_MIN_PCT..=DISCOUNT_MAX_PCT).contains(&discount_pct) {
            return Err(ForecastError::DiscountOutOfRange {
                value: discount_pct,
                min: DISCOUNT_MIN_PCT,
                max: DISCOUNT_MAX_PCT,
            });
        }
        Ok(Self {
            discount_pct,
            competitor,
        })
    }
}

/// Apply a flat discount for the whole period: selling price becomes
/// base price scaled by (1 - pct/100), the discount column is
/// overwritten where present, and the price ratio is recomputed where
/// a competitor price exists. Rows without a base price pass through
/// unchanged.
pub fn apply_discount(rows: &[DayRow], discount_pct: f64) -> Vec<DayRow> {
    let mut out = rows.to_vec();
    let mut touched = false;

    for row in &mut out {
        let Some(base) = row.get(columns::BASE_PRICE) else {
            continue;
        };
        touched = true;

        let selling = base * (1.0 - discount_pct / 100.0);
        row.set(columns::SELLING_PRICE, selling);
        if row.has(columns::DISCOUNT_PCT) {
            row.set(columns::DISCOUNT_PCT, discount_pct);
        }
        if let Some(competitor) = row.get(columns::COMPETITOR_PRICE) {
            row.set(columns::PRICE_RATIO, selling / competitor);
        }
    }

    if !touched && !out.is_empty() {
        log::debug!("scenario: no base-price column anywhere, discount is a no-op");
    }
    out
}

/// Scale competitor prices by (1 + pct/100) and recompute the price
/// ratio where a selling price exists. Named per-competitor columns
/// (configuration data on the schema) are scaled by the same factor.
/// An adjustment of 0 returns the input unchanged.
pub fn apply_competition(
    rows: &[DayRow],
    adjustment_pct: f64,
    competitor_columns: &[String],
) -> Vec<DayRow> {
    if adjustment_pct == 0.0 {
        return rows.to_vec();
    }

    let factor = 1.0 + adjustment_pct / 100.0;
    let mut out = rows.to_vec();

    for row in &mut out {
        if let Some(competitor) = row.get(columns::COMPETITOR_PRICE) {
            let scaled = competitor * factor;
            row.set(columns::COMPETITOR_PRICE, scaled);
            if let Some(selling) = row.get(columns::SELLING_PRICE) {
                row.set(columns::PRICE_RATIO, selling / scaled);
            }
        }
        for column in competitor_columns {
            if let Some(value) = row.get(column) {
                row.set(column, value * factor);
            }
        }
    }

    out
}

/// The canonical composition for one run: discount, then competition.
pub fn apply_scenario(
    rows: &[DayRow],
    params: &ScenarioParams,
    schema: &FeatureSchema,
) -> Vec<DayRow> {
    let discounted = apply_discount(rows, params.discount_pct);
    apply_competition(
        &discounted,
        params.competitor.adjustment_pct(),
        schema.competitor_columns(),
    )
}
