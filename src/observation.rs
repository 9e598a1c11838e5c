use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A raw count of events (trips) recorded for one zip code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub zip_code: String,
    pub count: u64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, zip_code: &str, count: u64) -> Self {
        Self {
            timestamp,
            zip_code: zip_code.to_string(),
            count,
        }
    }

    /// Observation stamped at midnight UTC of `date`.
    pub fn on_date(date: NaiveDate, zip_code: &str, count: u64) -> Self {
        Self::new(midnight(date), zip_code, count)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Parses RFC 3339, a naive `YYYY-MM-DD HH:MM:SS` (read as UTC) or a bare date.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(midnight)
        .map_err(|_| anyhow!("unrecognised timestamp '{raw}'"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2021-03-01T23:30:00-06:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 3, 2, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date() {
        let ts = parse_timestamp("2021-03-01").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_datetime() {
        let ts = parse_timestamp("2021-03-01 12:15:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 3, 1, 12, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("last tuesday").is_err());
    }

    #[test]
    fn test_json_accepts_bare_date() {
        let obs: Observation =
            serde_json::from_str(r#"{"timestamp":"2021-03-01","zip_code":"60601","count":12}"#)
                .unwrap();
        assert_eq!(obs.date(), NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(obs.count, 12);
    }
}
