use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("no rows match product '{product}'")]
    EmptyProductSelection { product: String },

    #[error("predictor declares an empty feature set")]
    EmptyFeatureSet,

    #[error("discount must be within [{min}, {max}], got {value}")]
    DiscountOutOfRange { value: f64, min: f64, max: f64 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ForecastResult<T> = Result<T, ForecastError>;
