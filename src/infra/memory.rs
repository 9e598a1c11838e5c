use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::observation::Observation;
use crate::services::observation_store::ObservationStore;

/// Immutable in-memory store, grouped by zip code and sorted by time.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    by_zip: BTreeMap<String, Vec<Observation>>,
}

impl MemoryStore {
    pub fn new(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut by_zip: BTreeMap<String, Vec<Observation>> = BTreeMap::new();

        for obs in observations {
            by_zip.entry(obs.zip_code.clone()).or_default().push(obs);
        }

        for series in by_zip.values_mut() {
            series.sort_by_key(|o| o.timestamp);
        }

        Self { by_zip }
    }

    /// Total number of observations held.
    pub fn len(&self) -> usize {
        self.by_zip.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zip.is_empty()
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn zip_codes(&self) -> Result<Vec<String>> {
        Ok(self.by_zip.keys().cloned().collect())
    }

    async fn latest(&self, zip_code: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .by_zip
            .get(zip_code)
            .and_then(|series| series.last())
            .map(|o| o.timestamp))
    }

    async fn observations(
        &self,
        zip_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let Some(series) = self.by_zip.get(zip_code) else {
            return Ok(Vec::new());
        };

        Ok(series
            .iter()
            .filter(|o| (from..=to).contains(&o.date()))
            .cloned()
            .collect())
    }
}
