use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ForecastError;

/// Aggregation bucket size for a forecast series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Day, Granularity::Week, Granularity::Month];

    /// Short wire code (`d`, `w`, `m`).
    pub fn code(self) -> &'static str {
        match self {
            Granularity::Day => "d",
            Granularity::Week => "w",
            Granularity::Month => "m",
        }
    }

    /// First day of the bucket containing `date`. Weeks start on Monday.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Moves a bucket start `n` buckets forward.
    pub fn advance(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.checked_add_days(Days::new(u64::from(n))),
            Granularity::Week => start.checked_add_days(Days::new(7 * u64::from(n))),
            Granularity::Month => start.checked_add_months(Months::new(n)),
        }
    }

    /// Moves a bucket start `n` buckets backward.
    pub fn rewind(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.checked_sub_days(Days::new(u64::from(n))),
            Granularity::Week => start.checked_sub_days(Days::new(7 * u64::from(n))),
            Granularity::Month => start.checked_sub_months(Months::new(n)),
        }
    }

    /// Canonical label: ISO date for days and week starts, `YYYY-MM` for months.
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Granularity::Day | Granularity::Week => start.format("%Y-%m-%d").to_string(),
            Granularity::Month => start.format("%Y-%m").to_string(),
        }
    }

    /// Seasonal cycle length in buckets, if the granularity has one worth modelling.
    pub fn season_length(self) -> Option<usize> {
        match self {
            Granularity::Day => Some(7),
            Granularity::Week => None,
            Granularity::Month => Some(12),
        }
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Granularity::Day),
            "w" | "week" | "weekly" => Ok(Granularity::Week),
            "m" | "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(ForecastError::InvalidGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Granularity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Granularity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("d".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!("Weekly".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!(" month ".parse::<Granularity>().unwrap(), Granularity::Month);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "y".parse::<Granularity>().unwrap_err();
        assert_eq!(err, ForecastError::InvalidGranularity("y".to_string()));
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2021-03-07 is a Sunday
        assert_eq!(
            Granularity::Week.bucket_start(date(2021, 3, 7)),
            date(2021, 3, 1)
        );
        assert_eq!(
            Granularity::Week.bucket_start(date(2021, 3, 1)),
            date(2021, 3, 1)
        );
    }

    #[test]
    fn test_month_bucket_and_label() {
        let start = Granularity::Month.bucket_start(date(2021, 2, 17));
        assert_eq!(start, date(2021, 2, 1));
        assert_eq!(Granularity::Month.label(start), "2021-02");
        assert_eq!(
            Granularity::Month.advance(start, 11),
            Some(date(2022, 1, 1))
        );
    }

    #[test]
    fn test_advance_and_rewind_are_inverse() {
        for g in Granularity::ALL {
            let start = g.bucket_start(date(2020, 12, 30));
            let forward = g.advance(start, 5).unwrap();
            assert_eq!(g.rewind(forward, 5), Some(start));
        }
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Granularity::Week).unwrap(), "\"w\"");
        let g: Granularity = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(g, Granularity::Month);
    }
}
