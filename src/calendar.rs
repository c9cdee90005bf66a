//! Day-by-day walk over the operating window.
//!
//! Generation advances one calendar day at a time. Each day knows its
//! opening hours as epoch milliseconds in the kiosk's time zone.

use std::fmt;
use chrono::{Datelike, FixedOffset, NaiveDate, TimeZone};

use crate::catalog::SeasonBucket;

/// A single day the exhibition was open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisitDay {
    pub date: NaiveDate,
}

impl VisitDay {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Season bucket used to bias fragrance choice on this day.
    pub fn season(&self) -> SeasonBucket {
        SeasonBucket::from_month(self.month())
    }

    /// Epoch milliseconds of `hour:00` local time on this day.
    pub fn local_hour_millis(&self, hour: u32, offset: &FixedOffset) -> Option<i64> {
        let naive = self.date.and_hms_opt(0, 0, 0)? + chrono::Duration::hours(hour as i64);
        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.timestamp_millis())
    }

    /// Opening window `[open, close)` as epoch milliseconds.
    pub fn opening_window(&self, open: u32, close: u32, offset: &FixedOffset) -> Option<(i64, i64)> {
        Some((self.local_hour_millis(open, offset)?, self.local_hour_millis(close, offset)?))
    }
}

impl fmt::Display for VisitDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// Iterator over every day in `[start, end]`, inclusive.
#[derive(Clone, Debug)]
pub struct DayCursor {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayCursor {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { next: Some(start), end }
    }
}

impl Iterator for DayCursor {
    type Item = VisitDay;

    fn next(&mut self) -> Option<VisitDay> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(VisitDay::new(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cursor_is_inclusive() {
        let days: Vec<_> = DayCursor::new(date(2024, 2, 27), date(2024, 3, 1)).collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[2].date, date(2024, 2, 29));
        assert_eq!(days[3].date, date(2024, 3, 1));
    }

    #[test]
    fn test_cursor_single_day() {
        let days: Vec<_> = DayCursor::new(date(2024, 1, 1), date(2024, 1, 1)).collect();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_cursor_empty_when_reversed() {
        assert_eq!(DayCursor::new(date(2024, 1, 2), date(2024, 1, 1)).count(), 0);
    }

    #[test]
    fn test_default_window_length() {
        assert_eq!(DayCursor::new(date(2023, 9, 1), date(2025, 8, 30)).count(), 730);
    }

    #[test]
    fn test_opening_window_in_kst() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let day = VisitDay::new(date(2023, 9, 1));
        let (open, close) = day.opening_window(10, 20, &kst).unwrap();
        // 2023-09-01 10:00 KST == 01:00 UTC
        assert_eq!(open, 1_693_530_000_000);
        assert_eq!(close - open, 10 * 3600 * 1000);
    }

    #[test]
    fn test_display_and_season() {
        let day = VisitDay::new(date(2024, 7, 4));
        assert_eq!(day.to_string(), "2024-07-04");
        assert_eq!(day.season(), SeasonBucket::Summer);
    }
}
