//! Loads observations from CSV files into a [`MemoryStore`].
//!
//! Files carry a `timestamp,zip_code,count` header. A directory is scanned
//! for `*.csv` and gzip-compressed `*.csv.gz` files.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::{debug, info, warn};

use crate::infra::memory::MemoryStore;
use crate::observation::Observation;

/// Reads `path` (a file or a directory of files) into a store.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_store(path: &Path) -> Result<MemoryStore> {
    let files = observation_files(path)?;
    let mut observations = Vec::new();

    for file in &files {
        let rows = read_file(file)?;
        debug!(file = %file.display(), rows = rows.len(), "Observation file loaded");
        observations.extend(rows);
    }

    let store = MemoryStore::new(observations);
    if store.is_empty() {
        warn!(files = files.len(), "No observations found");
    }
    info!(files = files.len(), observations = store.len(), "Observation store ready");
    Ok(store)
}

fn observation_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("reading {}", path.display()))? {
        let path = entry?.path();
        if path.is_file() && is_observation_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn is_observation_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".csv") || name.ends_with(".csv.gz")
}

fn read_file(path: &Path) -> Result<Vec<Observation>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    let result = if gzipped {
        read_csv(GzDecoder::new(file))
    } else {
        read_csv(file)
    };

    result.with_context(|| format!("parsing {}", path.display()))
}

/// Deserializes observation rows from any CSV reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: Observation = result?;
        rows.push(record);
    }

    Ok(rows)
}
