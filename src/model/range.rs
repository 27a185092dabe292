use crate::model::{MetricsError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Query window accepted by the contributions API, at most one year wide.
pub type Window = (DateTime<Utc>, DateTime<Utc>);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DateRange {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

// Create
impl DateRange {
    /// Builds the range from the CLI date arguments. `since` counts from
    /// midnight UTC, `until` counts through 23:59:59 UTC of that day.
    pub fn from_args(since: &str, until: &str) -> Result<Self> {
        let since = Self::parse_date(since)?
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let until = Self::parse_date(until)?
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc();
        if until < since {
            return Err(MetricsError::arguments(format!(
                "end date {} is before start date {}",
                until.format("%Y-%m-%d"),
                since.format("%Y-%m-%d"),
            )));
        }
        Ok(Self { since, until })
    }

    fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            MetricsError::arguments(format!("`{}` is not a YYYY-MM-DD date", value))
        })
    }
}

// Windows
impl DateRange {
    /// Splits the range into consecutive windows the contributions API
    /// accepts. Spans over a year are rejected by the platform, so each
    /// window is capped at 365 days and the caller sums the counts.
    pub fn windows(&self) -> Vec<Window> {
        let mut windows = Vec::new();
        let mut cursor = self.since;
        loop {
            let cap = cursor + Duration::days(365) - Duration::seconds(1);
            let end = if cap < self.until { cap } else { self.until };
            windows.push((cursor, end));
            if end >= self.until {
                return windows;
            }
            cursor = end + Duration::seconds(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricsError;

    #[test]
    fn test_from_args_parses_iso_dates() {
        let range = DateRange::from_args("2025-04-02", "2025-08-01").unwrap();
        assert_eq!(range.since.to_rfc3339(), "2025-04-02T00:00:00+00:00");
        assert_eq!(range.until.to_rfc3339(), "2025-08-01T23:59:59+00:00");
    }

    #[test]
    fn test_from_args_single_day() {
        let range = DateRange::from_args("2025-04-02", "2025-04-02").unwrap();
        assert!(range.since < range.until);
    }

    #[test]
    fn test_from_args_rejects_garbage() {
        let result = DateRange::from_args("02.04.2025", "2025-08-01");
        assert!(matches!(result, Err(MetricsError::Arguments { .. })));
    }

    #[test]
    fn test_from_args_rejects_inverted_range() {
        let result = DateRange::from_args("2025-08-01", "2025-04-02");
        assert!(matches!(result, Err(MetricsError::Arguments { .. })));
    }

    #[test]
    fn test_windows_short_range_is_single() {
        let range = DateRange::from_args("2025-04-02", "2025-08-01").unwrap();
        let windows = range.windows();
        assert_eq!(windows, vec![(range.since, range.until)]);
    }

    #[test]
    fn test_windows_cover_long_range_without_gaps() {
        let range = DateRange::from_args("2022-01-01", "2025-08-01").unwrap();
        let windows = range.windows();
        assert!(windows.len() > 1);
        assert_eq!(windows.first().unwrap().0, range.since);
        assert_eq!(windows.last().unwrap().1, range.until);
        for window in &windows {
            assert!(window.0 <= window.1);
            assert!(window.1 - window.0 < Duration::days(366));
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1 + Duration::seconds(1), pair[1].0);
        }
    }
}
