//! The simulation context — explicit, dependency-injected handles.
//!
//! RULE: No global state. The application shell loads the model and
//! dataset (and caches them however it likes), then constructs one
//! `SimContext` and passes it to whoever runs simulations. The core
//! itself never loads anything.

use crate::error::ForecastResult;
use crate::forecaster::{Forecaster, PredictionSeries};
use crate::metrics::{self, ScenarioMetrics};
use crate::predictor::Predictor;
use crate::scenario::{CompetitorScenario, ScenarioParams};
use crate::schema::{FeatureFamilies, FeatureSchema};
use crate::skeleton::Dataset;
use crate::types::ProductName;
use serde::Serialize;
use std::sync::Arc;

/// Everything the presentation layer needs from one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub product: ProductName,
    pub params: ScenarioParams,
    pub series: PredictionSeries,
    pub metrics: ScenarioMetrics,
}

pub struct SimContext {
    predictor: Arc<dyn Predictor>,
    dataset: Dataset,
    schema: FeatureSchema,
}

impl SimContext {
    /// Wire up a context. The feature set is read from the predictor
    /// here, once, and is immutable afterwards.
    pub fn new(
        predictor: Arc<dyn Predictor>,
        dataset: Dataset,
        families: FeatureFamilies,
    ) -> ForecastResult<Self> {
        let schema = FeatureSchema::new(predictor.declared_feature_names().to_vec(), families)?;
        log::info!(
            "context: ready, {} features, {} dataset rows, {} products",
            schema.len(),
            dataset.len(),
            dataset.products().len()
        );
        Ok(Self {
            predictor,
            dataset,
            schema,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn products(&self) -> Vec<ProductName> {
        self.dataset.products()
    }

    /// Run one scenario for one product and aggregate its KPIs.
    ///
    /// Each call works on freshly cloned rows and a fresh lag
    /// history, so outcomes are independent across calls.
    pub fn simulate(
        &self,
        product: &str,
        params: &ScenarioParams,
    ) -> ForecastResult<ScenarioOutcome> {
        let rows = self.dataset.rows_for_product(product);
        let mut forecaster = Forecaster::new(self.predictor.as_ref(), &self.schema);
        let series = forecaster.run(product, &rows, params)?;
        let metrics = metrics::aggregate(&series);
        Ok(ScenarioOutcome {
            product: product.to_string(),
            params: *params,
            series,
            metrics,
        })
    }

    /// Run all three competitor scenarios at the given discount, each
    /// on its own copies. Serial on purpose: predictor bindings are
    /// not assumed thread-safe.
    pub fn simulate_comparison(
        &self,
        product: &str,
        discount_pct: f64,
    ) -> ForecastResult<Vec<ScenarioOutcome>> {
        CompetitorScenario::ALL
            .iter()
            .map(|competitor| {
                let params = ScenarioParams::new(discount_pct, *competitor)?;
                self.simulate(product, &params)
            })
            .collect()
    }
}
