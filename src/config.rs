//! Engine tuning, optionally loaded from a JSON file.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides at the top level. A per-granularity block, when present, must
//! be complete:
//! ```json
//! {
//!   "confidence_level": 0.9,
//!   "baseline": "moving_average",
//!   "week": { "window": 6, "default_horizon": 8, "max_horizon": 52, "lookback": 78 }
//! }
//! ```

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::forecast::granularity::Granularity;

/// How the level and trend of the trailing window are estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// Least-squares line over the window, projected forward.
    #[default]
    Linear,
    /// Flat projection of the window mean.
    MovingAverage,
}

/// Tuning for one granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularitySettings {
    /// Trailing buckets used to fit the baseline.
    pub window: usize,
    /// Horizon used when the caller does not ask for one.
    pub default_horizon: usize,
    /// Largest horizon accepted.
    pub max_horizon: usize,
    /// Buckets of history fetched from the store.
    pub lookback: u32,
}

impl GranularitySettings {
    /// Validates a caller-supplied horizon, falling back to the default when absent.
    pub fn horizon(&self, raw: Option<&str>) -> Result<usize, ForecastError> {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(self.default_horizon);
        };

        let invalid = || ForecastError::InvalidHorizon {
            value: raw.to_string(),
            max: self.max_horizon,
        };

        let value: i64 = raw.parse().map_err(|_| invalid())?;
        let value = usize::try_from(value).map_err(|_| invalid())?;
        self.check_horizon(value).map_err(|_| invalid())
    }

    pub fn check_horizon(&self, horizon: usize) -> Result<usize, ForecastError> {
        if horizon == 0 || horizon > self.max_horizon {
            return Err(ForecastError::InvalidHorizon {
                value: horizon.to_string(),
                max: self.max_horizon,
            });
        }
        Ok(horizon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fewest aggregated buckets a forecast is attempted on.
    pub min_buckets: usize,
    /// Two-sided coverage of the bounds (0.80, 0.90, 0.95 or 0.99).
    pub confidence_level: f64,
    pub baseline: Baseline,
    /// Adjust for weekly (daily data) or yearly (monthly data) seasonality.
    pub seasonal: bool,
    pub day: GranularitySettings,
    pub week: GranularitySettings,
    pub month: GranularitySettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_buckets: 3,
            confidence_level: 0.95,
            baseline: Baseline::Linear,
            seasonal: true,
            day: GranularitySettings {
                window: 14,
                default_horizon: 30,
                max_horizon: 365,
                lookback: 180,
            },
            week: GranularitySettings {
                window: 8,
                default_horizon: 12,
                max_horizon: 104,
                lookback: 104,
            },
            month: GranularitySettings {
                window: 6,
                default_horizon: 6,
                max_horizon: 36,
                lookback: 36,
            },
        }
    }
}

impl EngineConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        let config: EngineConfig =
            serde_json::from_str(&content).with_context(|| format!("parsing config '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn settings(&self, granularity: Granularity) -> &GranularitySettings {
        match granularity {
            Granularity::Day => &self.day,
            Granularity::Week => &self.week,
            Granularity::Month => &self.month,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.min_buckets >= 2, "min_buckets must be at least 2");
        ensure!(
            self.confidence_level > 0.0 && self.confidence_level < 1.0,
            "confidence_level must be within (0, 1)"
        );

        for granularity in Granularity::ALL {
            let s = self.settings(granularity);
            ensure!(s.window >= 2, "{granularity}: window must be at least 2");
            ensure!(
                s.default_horizon >= 1 && s.default_horizon <= s.max_horizon,
                "{granularity}: default_horizon must be between 1 and max_horizon"
            );
            ensure!(
                s.lookback as usize >= self.min_buckets,
                "{granularity}: lookback must cover min_buckets"
            );
        }

        Ok(())
    }
}
