//! Feature resolver — builds the model input vector for one day row.
//!
//! Missing required columns default silently (0.0 for numerics, 0.0
//! for absent one-hot categories). This is a documented approximation
//! the model was trained under, not an error condition, so resolution
//! never fails and never logs above debug.

use crate::schema::FeatureSchema;
use crate::skeleton::DayRow;

/// Produce the feature vector for `row`, matching the schema's column
/// set exactly and in order. Columns on `row` outside the schema are
/// dropped. Pure: `row` is never mutated.
pub fn resolve(row: &DayRow, schema: &FeatureSchema) -> Vec<f64> {
    schema
        .feature_names()
        .iter()
        .map(|name| match row.get(name) {
            Some(value) => value,
            None => {
                log::debug!(
                    "features: '{name}' missing on {}, defaulting",
                    row.date
                );
                schema.default_for(name)
            }
        })
        .collect()
}
