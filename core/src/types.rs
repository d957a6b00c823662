//! Shared primitive types used across the forecast core.

/// Zero-based position of a day within the simulated month.
pub type DayIndex = usize;

/// Product selector, matching the dataset's product-name values.
pub type ProductName = String;

/// Caller-chosen identifier for one simulation run. Logging only.
pub type RunId = String;
