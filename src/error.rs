//! Error taxonomy for forecast requests.

use thiserror::Error;

/// Result alias used throughout the forecasting core.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Everything that can go wrong while answering a forecast request.
///
/// None of these are retried internally; the caller receives the kind and
/// message as-is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    /// The zip code has no observations in the store.
    #[error("no observations for zip code '{zip_code}'")]
    NotFound { zip_code: String },

    /// Too few aggregated buckets to fit a trend.
    #[error("insufficient data: need at least {needed} periods, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Granularity outside of day/week/month.
    #[error("invalid period '{0}': expected one of d, w, m")]
    InvalidGranularity(String),

    /// Horizon that is not a positive integer within the configured cap.
    #[error("invalid horizon '{value}': must be between 1 and {max}")]
    InvalidHorizon { value: String, max: usize },

    /// A required request parameter was absent or empty.
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// The observation store failed to answer.
    #[error("observation store error: {0}")]
    Store(String),
}

impl ForecastError {
    /// Stable machine-readable kind, used in structured error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::NotFound { .. } => "not_found",
            ForecastError::InsufficientData { .. } => "insufficient_data",
            ForecastError::InvalidGranularity(_) => "invalid_granularity",
            ForecastError::InvalidHorizon { .. } => "invalid_horizon",
            ForecastError::MissingParameter(_) => "missing_parameter",
            ForecastError::Store(_) => "store_unavailable",
        }
    }
}

impl From<anyhow::Error> for ForecastError {
    fn from(err: anyhow::Error) -> Self {
        ForecastError::Store(format!("{err:#}"))
    }
}
