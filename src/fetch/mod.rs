mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Result, bail};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

/// GETs `url` and decodes the JSON body. Any non-success status is an error.
pub async fn fetch_json<C, T>(client: &C, url: Url) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    match fetch_optional_json(client, url.clone()).await? {
        Some(value) => Ok(value),
        None => bail!("GET {url} returned 404 Not Found"),
    }
}

/// Like [`fetch_json`], but maps `404 Not Found` to `None`.
pub async fn fetch_optional_json<C, T>(client: &C, url: Url) -> Result<Option<T>>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());
    let resp = client.execute(req).await?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("GET {url} returned status {status}: {body}");
    }

    Ok(Some(resp.json().await?))
}
