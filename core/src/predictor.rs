//! External predictor boundary.
//!
//! The trained model lives outside the core (loaded by the
//! application shell). The core treats it as a stateless,
//! side-effect-free call that may fail per invocation; the forecaster
//! absorbs failures with its fallback policy instead of aborting the
//! run.

/// A loaded regression model, ready to score single day rows.
///
/// `Send + Sync` so independent scenario runs may execute
/// concurrently. Bindings that are not thread-safe must serialize
/// their own calls; correctness over throughput.
pub trait Predictor: Send + Sync {
    /// Column names the model requires, in order. Read once at load
    /// time; must not change between calls.
    fn declared_feature_names(&self) -> &[String];

    /// Score one resolved feature vector, returning predicted units.
    /// The vector matches `declared_feature_names` in length and
    /// order.
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64>;
}
