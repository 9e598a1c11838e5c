use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Url;
use tracing::debug;

use crate::fetch::{HttpClient, fetch_json, fetch_optional_json};
use crate::observation::Observation;
use crate::services::observation_store::ObservationStore;

/// Observation store served over HTTP/JSON.
///
/// Expects three endpoints under `base_url`:
/// - `GET zip-codes` → `["60601", ...]`
/// - `GET observations/latest?zip=` → one observation, 404 when unknown
/// - `GET observations?zip=&from=&to=` → observations in the inclusive range
pub struct RemoteStore<C> {
    base_url: Url,
    client: C,
}

impl<C: HttpClient> RemoteStore<C> {
    pub fn new(base_url: &str, client: C) -> Result<Self> {
        // a trailing slash makes relative joins append instead of replace
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).with_context(|| format!("invalid store URL '{base_url}'"))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> ObservationStore for RemoteStore<C> {
    async fn zip_codes(&self) -> Result<Vec<String>> {
        let url = self.endpoint("zip-codes", &[])?;
        let mut zips: Vec<String> = fetch_json(&self.client, url)
            .await
            .context("listing zip codes")?;
        zips.sort();
        zips.dedup();
        Ok(zips)
    }

    async fn latest(&self, zip_code: &str) -> Result<Option<DateTime<Utc>>> {
        let url = self.endpoint("observations/latest", &[("zip", zip_code)])?;
        let latest: Option<Observation> = fetch_optional_json(&self.client, url)
            .await
            .with_context(|| format!("fetching latest observation for {zip_code}"))?;
        Ok(latest.map(|o| o.timestamp))
    }

    async fn observations(
        &self,
        zip_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let (from, to) = (from.to_string(), to.to_string());
        let url = self.endpoint(
            "observations",
            &[("zip", zip_code), ("from", from.as_str()), ("to", to.as_str())],
        )?;

        let mut rows: Vec<Observation> = fetch_json(&self.client, url)
            .await
            .with_context(|| format!("fetching observations for {zip_code}"))?;

        // the server is trusted for the range but not for ordering
        rows.retain(|o| o.zip_code == zip_code);
        rows.sort_by_key(|o| o.timestamp);
        debug!(zip_code, rows = rows.len(), "Remote observations received");

        Ok(rows)
    }
}
