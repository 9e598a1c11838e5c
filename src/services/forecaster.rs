use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastResult, Granularity, forecast};
use crate::services::observation_store::ObservationStore;

/// Answers forecast requests against an [`ObservationStore`].
///
/// Cloning is cheap; clones share the store and config read-only.
#[derive(Clone)]
pub struct Forecaster {
    store: Arc<dyn ObservationStore>,
    config: Arc<EngineConfig>,
}

impl Forecaster {
    pub fn new(store: Arc<dyn ObservationStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn zip_codes(&self) -> Result<Vec<String>> {
        Ok(self.store.zip_codes().await?)
    }

    /// Fetches the lookback window for `zip_code` and runs the engine on it.
    ///
    /// The window ends at the newest observation for the zip code, so stale
    /// datasets still forecast from their own last period.
    #[tracing::instrument(skip(self), fields(period = %granularity))]
    pub async fn forecast(
        &self,
        zip_code: &str,
        granularity: Granularity,
        horizon: usize,
    ) -> Result<ForecastResult> {
        let settings = self.config.settings(granularity);
        settings.check_horizon(horizon)?;

        let latest = self
            .store
            .latest(zip_code)
            .await?
            .ok_or_else(|| ForecastError::NotFound {
                zip_code: zip_code.to_string(),
            })?;

        let to = latest.date_naive();
        let from = granularity
            .rewind(
                granularity.bucket_start(to),
                settings.lookback.saturating_sub(1),
            )
            .unwrap_or(NaiveDate::MIN);

        let observations = self.store.observations(zip_code, from, to).await?;
        debug!(%from, %to, observations = observations.len(), "Observations fetched");

        let result = forecast(&observations, zip_code, granularity, horizon, &self.config)?;

        info!(
            historical = result.historical.len(),
            forecast = result.forecast.len(),
            "Forecast computed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryStore;
    use crate::observation::Observation;
    use chrono::{DateTime, Utc};

    /// Store whose every call fails, for error propagation tests.
    struct BrokenStore;

    #[async_trait::async_trait]
    impl ObservationStore for BrokenStore {
        async fn zip_codes(&self) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("connection refused")
        }

        async fn latest(&self, _zip_code: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
            anyhow::bail!("connection refused")
        }

        async fn observations(
            &self,
            _zip_code: &str,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> anyhow::Result<Vec<Observation>> {
            anyhow::bail!("connection refused")
        }
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + chrono::Days::new(offset)
    }

    fn forecaster(observations: Vec<Observation>, config: EngineConfig) -> Forecaster {
        Forecaster::new(Arc::new(MemoryStore::new(observations)), config)
    }

    #[tokio::test]
    async fn test_unknown_zip_is_not_found() {
        let f = forecaster(vec![], EngineConfig::default());
        let err = f.forecast("60601", Granularity::Day, 3).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_lookback_limits_history() {
        let observations = (0..100)
            .map(|i| Observation::on_date(day(i), "60601", 10))
            .collect();
        let mut config = EngineConfig::default();
        config.day.lookback = 30;

        let result = forecaster(observations, config)
            .forecast("60601", Granularity::Day, 5)
            .await
            .unwrap();

        assert_eq!(result.historical.len(), 30);
        assert_eq!(result.historical[0].period(), "2021-03-12");
        assert_eq!(result.forecast.len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_horizon_checked_before_store() {
        let f = Forecaster::new(Arc::new(BrokenStore), EngineConfig::default());
        let err = f.forecast("60601", Granularity::Week, 0).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_horizon");
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let f = Forecaster::new(Arc::new(BrokenStore), EngineConfig::default());
        let err = f.forecast("60601", Granularity::Week, 4).await.unwrap_err();
        assert_eq!(err, ForecastError::Store("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_store() {
        let observations = (0..20)
            .map(|i| Observation::on_date(day(i), "60601", 40 + i))
            .collect();
        let f = forecaster(observations, EngineConfig::default());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let f = f.clone();
                tokio::spawn(async move { f.forecast("60601", Granularity::Day, 7).await })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap().unwrap());
        }
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
