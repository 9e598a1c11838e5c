use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::forecast::granularity::Granularity;
use crate::observation::Observation;

/// Summed observations for one aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start: NaiveDate,
    pub count: u64,
}

/// Buckets the observations of `zip_code` into `granularity` periods.
///
/// The series runs from the first to the last observed bucket; periods
/// without observations are emitted with a zero count so the time axis
/// stays regular.
pub fn aggregate(
    observations: &[Observation],
    zip_code: &str,
    granularity: Granularity,
) -> Vec<Bucket> {
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for obs in observations.iter().filter(|o| o.zip_code == zip_code) {
        *totals
            .entry(granularity.bucket_start(obs.date()))
            .or_default() += obs.count;
    }

    let (Some(&first), Some(&last)) = (totals.keys().next(), totals.keys().next_back()) else {
        return Vec::new();
    };

    let mut buckets = Vec::with_capacity(totals.len());
    let mut cursor = first;

    while cursor <= last {
        buckets.push(Bucket {
            start: cursor,
            count: totals.get(&cursor).copied().unwrap_or(0),
        });

        match granularity.advance(cursor, 1) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    buckets
}
