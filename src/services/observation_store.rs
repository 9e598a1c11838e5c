//! Trait for reading trip observations from a backing store.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::observation::Observation;

/// Read-only access to observed trip counts.
///
/// Implementations must be safe to query concurrently; the forecast path
/// never writes through this trait.
#[async_trait::async_trait]
pub trait ObservationStore: Send + Sync {
    /// Returns every zip code with at least one observation, sorted.
    async fn zip_codes(&self) -> Result<Vec<String>>;

    /// Returns the newest observation timestamp for `zip_code`, or `None`
    /// when the zip code is unknown.
    async fn latest(&self, zip_code: &str) -> Result<Option<DateTime<Utc>>>;

    /// Returns the observations for `zip_code` dated within `from..=to`,
    /// in chronological order.
    async fn observations(
        &self,
        zip_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>>;
}
