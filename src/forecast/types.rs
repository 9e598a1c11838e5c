//! Result types returned by the engine and serialized on the wire.

use serde::Serialize;

use crate::forecast::granularity::Granularity;

/// One period of a forecast, either observed or predicted.
///
/// Only constructible through [`ForecastPoint::new`], which guarantees
/// `lower_bound <= predicted <= upper_bound` and a non-negative prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    period: String,
    predicted: f64,
    lower_bound: f64,
    upper_bound: f64,
    historical: bool,
}

impl ForecastPoint {
    /// Builds a point centred on `predicted` with bounds `predicted ± half_width`.
    ///
    /// Negative or non-finite predictions collapse to zero; a non-finite
    /// half-width collapses the bounds onto the prediction.
    pub fn new(period: String, predicted: f64, half_width: f64, historical: bool) -> Self {
        let predicted = if predicted.is_finite() {
            predicted.max(0.0)
        } else {
            0.0
        };
        let half_width = if half_width.is_finite() {
            half_width.abs()
        } else {
            0.0
        };

        let point = Self {
            period,
            predicted,
            lower_bound: predicted - half_width,
            upper_bound: predicted + half_width,
            historical,
        };
        debug_assert!(point.lower_bound <= point.predicted && point.predicted <= point.upper_bound);
        point
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn predicted(&self) -> f64 {
        self.predicted
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn is_historical(&self) -> bool {
        self.historical
    }

    /// Distance between the bounds.
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Historical reconstruction plus forward prediction for one zip code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub zip_code: String,
    pub period: Granularity,
    pub historical: Vec<ForecastPoint>,
    pub forecast: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Historical points followed by forecast points.
    pub fn points(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.historical.iter().chain(self.forecast.iter())
    }
}
