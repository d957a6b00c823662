//! The recursive forecaster — the heart of the simulation core.
//!
//! Day k+1's lag and rolling-average features depend on day k's
//! prediction, so the loop is strictly sequential: resolve features,
//! predict, clamp, then write day k+1's row before it is processed.
//!
//! RULES:
//!   - The scenario transform is applied once, up front, never
//!     re-applied inside the loop.
//!   - Day-level predictor failures are absorbed by a deterministic
//!     fallback and surfaced as events, never as run failures.
//!   - Only pre-run structural failures (no rows) propagate.
//!   - No randomness anywhere: same model, skeleton, and parameters
//!     reproduce the same sequence exactly.

use crate::error::{ForecastError, ForecastResult};
use crate::features;
use crate::lags::{self, LagHistory};
use crate::predictor::Predictor;
use crate::scenario::{self, ScenarioParams};
use crate::schema::{columns, FeatureSchema};
use crate::skeleton::{sort_by_date, DayRow};
use crate::types::DayIndex;
use chrono::NaiveDate;
use serde::Serialize;

/// Progress of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running(DayIndex),
    Completed,
}

/// One recovered predictor failure. Observability only; the run
/// continued with `value`.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackEvent {
    pub day: DayIndex,
    pub date: NaiveDate,
    pub value: f64,
    pub reason: String,
}

/// The finished output of one run: the scenario-adjusted rows with
/// the derived prediction column attached, the ordered predictions,
/// and any recovered fallbacks. Owned solely by the requesting
/// caller; never shared across scenario runs.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSeries {
    pub rows: Vec<DayRow>,
    pub predictions: Vec<f64>,
    pub fallbacks: Vec<FallbackEvent>,
}

impl PredictionSeries {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Day rows paired with their predictions, in date order.
    pub fn days(&self) -> impl Iterator<Item = (&DayRow, f64)> {
        self.rows.iter().zip(self.predictions.iter().copied())
    }
}

pub struct Forecaster<'a> {
    predictor: &'a dyn Predictor,
    schema: &'a FeatureSchema,
    state: RunState,
}

impl<'a> Forecaster<'a> {
    pub fn new(predictor: &'a dyn Predictor, schema: &'a FeatureSchema) -> Self {
        Self {
            predictor,
            schema,
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run one full simulation over `rows` (one product's month).
    ///
    /// Refuses to run on an empty selection; every other condition is
    /// recovered inside the loop. The caller's `rows` are never
    /// mutated.
    pub fn run(
        &mut self,
        product: &str,
        rows: &[DayRow],
        params: &ScenarioParams,
    ) -> ForecastResult<PredictionSeries> {
        if rows.is_empty() {
            return Err(ForecastError::EmptyProductSelection {
                product: product.to_string(),
            });
        }

        // Pre-simulation skeleton, date-sorted. Fallback statistics
        // come from here, never from predicted values.
        let mut baseline = rows.to_vec();
        sort_by_date(&mut baseline);
        let historical_mean = mean_historical_target(&baseline);

        // Scenario adjustments happen exactly once, before the loop.
        let mut series = scenario::apply_scenario(&baseline, params, self.schema);

        let n = series.len();
        log::info!(
            "forecaster: run start product='{product}' days={n} discount={:+.1}% competitor={}",
            params.discount_pct,
            params.competitor.label()
        );

        let mut history = LagHistory::new();
        let mut predictions: Vec<f64> = Vec::with_capacity(n);
        let mut fallbacks: Vec<FallbackEvent> = Vec::new();

        for day in 0..n {
            self.state = RunState::Running(day);

            let features = features::resolve(&series[day], self.schema);
            let raw = match self.predictor.predict(&features) {
                Ok(value) => value,
                Err(e) => {
                    let value = fallback_value(&baseline[day], historical_mean);
                    log::warn!(
                        "day={day} forecaster: predictor failed ({e}), falling back to {value:.3}"
                    );
                    fallbacks.push(FallbackEvent {
                        day,
                        date: baseline[day].date,
                        value,
                        reason: e.to_string(),
                    });
                    value
                }
            };

            let predicted = raw.max(0.0);
            predictions.push(predicted);

            if day + 1 < n {
                series[day + 1] =
                    lags::advance(&series[day], &series[day + 1], predicted, &mut history);
            }
        }

        for (row, predicted) in series.iter_mut().zip(&predictions) {
            row.set(columns::PREDICTED_UNITS, *predicted);
        }

        self.state = RunState::Completed;
        log::info!(
            "forecaster: run complete product='{product}' total_units={:.1} fallbacks={}",
            predictions.iter().sum::<f64>(),
            fallbacks.len()
        );

        Ok(PredictionSeries {
            rows: series,
            predictions,
            fallbacks,
        })
    }
}

/// Deterministic fallback for one failed day: the day's own
/// historical target where known, else the series-wide historical
/// mean, else 0.
fn fallback_value(row: &DayRow, historical_mean: Option<f64>) -> f64 {
    row.get(columns::UNITS_SOLD)
        .or(historical_mean)
        .unwrap_or(0.0)
}

/// Mean of the historical targets present on the pre-simulation
/// skeleton. None when no row carries one.
fn mean_historical_target(rows: &[DayRow]) -> Option<f64> {
    let known: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(columns::UNITS_SOLD))
        .collect();
    if known.is_empty() {
        None
    } else {
        Some(known.iter().sum::<f64>() / known.len() as f64)
    }
}
