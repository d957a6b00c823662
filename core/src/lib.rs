//! forecast-core — recursive day-by-day sales forecast simulation.
//!
//! Given a trained regression model, a day-level feature skeleton for
//! a future month, and user-chosen pricing/competitor scenario
//! parameters, produce a consistent day-ordered prediction sequence
//! where each day's lag and rolling-average features come strictly
//! from prior predicted values.
//!
//! PIPELINE (fixed order, documented in forecaster.rs):
//!   1. Scenario transform: discount, then competition. Once, up front.
//!   2. Sequential day loop: resolve features, predict, clamp,
//!      advance lag state into the next day's row.
//!   3. KPI aggregation over the completed series.
//!
//! The core holds no global state and does no I/O; model and dataset
//! arrive resident in memory through [`context::SimContext`].

pub mod context;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod lags;
pub mod metrics;
pub mod predictor;
pub mod scenario;
pub mod schema;
pub mod skeleton;
pub mod types;
