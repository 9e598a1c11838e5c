use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ForecastError, Result};
use crate::forecast::aggregate::aggregate;
use crate::forecast::bounds::{half_width, z_score};
use crate::forecast::granularity::Granularity;
use crate::forecast::model::Fit;
use crate::forecast::types::{ForecastPoint, ForecastResult};
use crate::observation::Observation;

/// Forecasts `horizon` periods for `zip_code` from the given observations.
///
/// Pure and synchronous: observations for other zip codes are ignored and
/// nothing is cached between calls.
///
/// # Errors
///
/// - [`ForecastError::InvalidHorizon`] if `horizon` is zero or above the cap
/// - [`ForecastError::NotFound`] if no observation belongs to `zip_code`
/// - [`ForecastError::InsufficientData`] if fewer than `min_buckets` periods aggregate
pub fn forecast(
    observations: &[Observation],
    zip_code: &str,
    granularity: Granularity,
    horizon: usize,
    config: &EngineConfig,
) -> Result<ForecastResult> {
    let settings = config.settings(granularity);
    let horizon = settings.check_horizon(horizon)?;

    let buckets = aggregate(observations, zip_code, granularity);
    let Some(last) = buckets.last().copied() else {
        return Err(ForecastError::NotFound {
            zip_code: zip_code.to_string(),
        });
    };

    if buckets.len() < config.min_buckets {
        return Err(ForecastError::InsufficientData {
            needed: config.min_buckets,
            got: buckets.len(),
        });
    }

    let series: Vec<f64> = buckets.iter().map(|b| b.count as f64).collect();
    let season_length = if config.seasonal {
        granularity.season_length()
    } else {
        None
    };
    let fit = Fit::estimate(&series, settings.window, config.baseline, season_length);
    let z = z_score(config.confidence_level);

    debug!(
        zip_code,
        period = %granularity,
        buckets = buckets.len(),
        slope = fit.slope(),
        sigma = fit.sigma(),
        seasonal = fit.is_seasonal(),
        "Fitted baseline"
    );

    let in_sample = half_width(z, fit.sigma(), 0);
    let historical = buckets
        .iter()
        .map(|b| ForecastPoint::new(granularity.label(b.start), b.count as f64, in_sample, true))
        .collect();

    let mut future = Vec::with_capacity(horizon);
    for lead in 1..=horizon {
        let start = u32::try_from(lead)
            .ok()
            .and_then(|n| granularity.advance(last.start, n))
            .ok_or_else(|| ForecastError::InvalidHorizon {
                value: horizon.to_string(),
                max: settings.max_horizon,
            })?;

        future.push(ForecastPoint::new(
            granularity.label(start),
            fit.predict(lead),
            half_width(z, fit.sigma(), lead),
            false,
        ));
    }

    Ok(ForecastResult {
        zip_code: zip_code.to_string(),
        period: granularity,
        historical,
        forecast: future,
    })
}
