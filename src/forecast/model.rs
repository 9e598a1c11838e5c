//! Trend and seasonal estimation over an aggregated series.

use crate::config::Baseline;
use crate::forecast::utility::{centered_moving_average, linear_fit, mean, stddev};

/// A baseline fitted to the tail of a series, ready to project forward.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    /// Deseasonalized level at the last observed period.
    level: f64,
    /// Change per period.
    slope: f64,
    /// Additive index per phase, `None` when seasonality is not modelled.
    seasonal: Option<Vec<f64>>,
    /// Length of the fitted series.
    len: usize,
    /// Residual spread, floored at Poisson noise for the level.
    sigma: f64,
}

impl Fit {
    /// Fits `baseline` over the trailing `window` values of `series`.
    ///
    /// Seasonal indices are estimated only when `season_length` is given and
    /// the series spans at least two full seasons.
    pub fn estimate(
        series: &[f64],
        window: usize,
        baseline: Baseline,
        season_length: Option<usize>,
    ) -> Self {
        let len = series.len();
        let seasonal = season_length.and_then(|m| seasonal_indices(series, m));

        let adjusted: Vec<f64> = match &seasonal {
            Some(indices) => series
                .iter()
                .enumerate()
                .map(|(i, y)| y - indices[i % indices.len()])
                .collect(),
            None => series.to_vec(),
        };

        let window = window.clamp(1, len.max(1));
        let tail = &adjusted[len.saturating_sub(window)..];

        let (level, slope, residuals) = match baseline {
            Baseline::Linear => {
                let (intercept, slope) = linear_fit(tail);
                let residuals: Vec<f64> = tail
                    .iter()
                    .enumerate()
                    .map(|(j, y)| y - (intercept + slope * j as f64))
                    .collect();
                let level = intercept + slope * (tail.len().saturating_sub(1)) as f64;
                (level, slope, residuals)
            }
            Baseline::MovingAverage => {
                let level = mean(tail);
                let residuals: Vec<f64> = tail.iter().map(|y| y - level).collect();
                (level, 0.0, residuals)
            }
        };

        let residual_sd = stddev(&residuals, mean(&residuals));
        let poisson_sd = level.max(1.0).sqrt();

        Self {
            level,
            slope,
            seasonal,
            len,
            sigma: residual_sd.max(poisson_sd),
        }
    }

    /// Point prediction `lead` periods after the last observation.
    pub fn predict(&self, lead: usize) -> f64 {
        let trend = self.level + self.slope * lead as f64;
        match &self.seasonal {
            Some(indices) => {
                let index = self.len - 1 + lead;
                trend + indices[index % indices.len()]
            }
            None => trend,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn is_seasonal(&self) -> bool {
        self.seasonal.is_some()
    }
}

/// Additive seasonal index per phase (`i % m`).
///
/// The series is detrended with a centered moving average of length `m`
/// before averaging by phase, and the indices are centered to sum to zero.
fn seasonal_indices(series: &[f64], m: usize) -> Option<Vec<f64>> {
    if m < 2 || series.len() < 2 * m {
        return None;
    }

    let trend = centered_moving_average(series, m);
    let half = m / 2;

    let mut sums = vec![0.0; m];
    let mut counts = vec![0usize; m];
    for (j, t) in trend.iter().enumerate() {
        let i = j + half;
        sums[i % m] += series[i] - t;
        counts[i % m] += 1;
    }

    let raw: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &n)| if n == 0 { 0.0 } else { sum / n as f64 })
        .collect();
    let centre = mean(&raw);

    Some(raw.into_iter().map(|s| s - centre).collect())
}
