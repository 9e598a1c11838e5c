//! Output formatting and persistence for forecast results.
//!
//! Supports JSON rendering and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::forecast::{ForecastPoint, ForecastResult, Granularity};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row: a forecast point tagged with its zip code and granularity.
#[derive(Debug, Serialize)]
struct ForecastRow<'a> {
    zip_code: &'a str,
    granularity: Granularity,
    period: &'a str,
    predicted: f64,
    lower_bound: f64,
    upper_bound: f64,
    historical: bool,
}

impl<'a> ForecastRow<'a> {
    fn new(result: &'a ForecastResult, point: &'a ForecastPoint) -> Self {
        Self {
            zip_code: &result.zip_code,
            granularity: result.period,
            period: point.period(),
            predicted: point.predicted(),
            lower_bound: point.lower_bound(),
            upper_bound: point.upper_bound(),
            historical: point.is_historical(),
        }
    }
}

/// Renders a forecast as pretty-printed JSON.
pub fn to_json(result: &ForecastResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Appends every point of a [`ForecastResult`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, result: &ForecastResult) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for point in result.points() {
        writer.serialize(ForecastRow::new(result, point))?;
    }
    writer.flush()?;

    Ok(())
}
