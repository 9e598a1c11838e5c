//! API route handlers

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastResult, Granularity};
use crate::server::AppState;

/// Raw query string of `/api/forecast`; validated in the handler so that
/// every rejection carries a structured error body.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub zip: Option<String>,
    pub period: Option<String>,
    pub horizon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ZipCodeEntry {
    pub zip_code: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub zip_codes: usize,
    pub version: &'static str,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `GET /api/forecast?zip=<code>&period=<d|w|m>[&horizon=<n>]`
pub async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResult>> {
    let zip = non_empty(query.zip.as_deref()).ok_or(ForecastError::MissingParameter("zip"))?;

    let granularity = match non_empty(query.period.as_deref()) {
        Some(period) => period.parse()?,
        None => Granularity::Day,
    };

    let horizon = state
        .forecaster
        .config()
        .settings(granularity)
        .horizon(query.horizon.as_deref())?;

    let result = state.forecaster.forecast(zip, granularity, horizon).await?;
    Ok(Json(result))
}

/// `GET /api/zip-codes`
pub async fn zip_codes(State(state): State<AppState>) -> Result<Json<Vec<ZipCodeEntry>>> {
    let zips = state.forecaster.zip_codes().await?;
    Ok(Json(
        zips.into_iter()
            .map(|zip_code| ZipCodeEntry { zip_code })
            .collect(),
    ))
}

/// `GET /health` — always 200; reports whether the store answers.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (store, zip_codes) = match state.forecaster.zip_codes().await {
        Ok(zips) => ("connected", zips.len()),
        Err(_) => ("unavailable", 0),
    };

    Json(HealthResponse {
        status: "ok",
        store,
        zip_codes,
        version: env!("CARGO_PKG_VERSION"),
    })
}
