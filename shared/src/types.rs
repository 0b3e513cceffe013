//! Common types used across the dashboard

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Half-open UTC window `[start, end)` covering one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Window starting at midnight UTC of `date` and ending 24 hours later
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = date
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_window_is_half_open() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let window = DayWindow::for_date(date);

        assert!(window.contains(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()));
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 3, 14, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_day_window_crosses_month_end() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let window = DayWindow::for_date(date);
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }
}
