//! Month anchor type

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Serialize, Serializer};

use super::{DaygridError, Result};

/// A calendar month, anchored at its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    /// 1-12
    month: u32,
}

/// Supported years, inclusive. Every grid in this range, and its neighbours,
/// stays well inside chrono's date range.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

const MIN_INDEX: i64 = MIN_YEAR as i64 * 12;
const MAX_INDEX: i64 = MAX_YEAR as i64 * 12 + 11;

impl Month {
    /// Build a month; `None` if `month` is not 1-12 or `year` is outside
    /// `MIN_YEAR..=MAX_YEAR`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// The month containing `date`, clamped to the supported years
    pub fn containing(date: NaiveDate) -> Self {
        Self::from_index(date.year() as i64 * 12 + date.month0() as i64)
    }

    fn from_index(index: i64) -> Self {
        let index = index.clamp(MIN_INDEX, MAX_INDEX);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    fn index(self) -> i64 {
        self.year as i64 * 12 + self.month as i64 - 1
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Day `day` of this month, clamped to the month length
    pub fn day_clamped(self, day: u32) -> NaiveDate {
        let last = self.last_day();
        NaiveDate::from_ymd_opt(self.year, self.month, day.clamp(1, last.day())).unwrap_or(last)
    }

    /// Next month
    pub fn succ(self) -> Self {
        self.offset(1)
    }

    /// Previous month
    pub fn pred(self) -> Self {
        self.offset(-1)
    }

    /// Move by `delta` months, stopping at the supported range
    pub fn offset(self, delta: i32) -> Self {
        Self::from_index(self.index() + delta as i64)
    }

    /// Months since year 0; stable ordinal used for mock ids
    pub fn ordinal(self) -> u32 {
        self.index() as u32
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Sunday on or before the first of the month
    pub fn grid_start(self) -> NaiveDate {
        let first = self.first_day();
        let lead = Days::new(first.weekday().num_days_from_sunday() as u64);
        first.checked_sub_days(lead).unwrap_or(first)
    }

    /// Saturday on or after the last of the month
    pub fn grid_end(self) -> NaiveDate {
        let last = self.last_day();
        let trail = Days::new(6 - last.weekday().num_days_from_sunday() as u64);
        last.checked_add_days(trail).unwrap_or(last)
    }

    /// Display title, e.g. "March 2024"
    pub fn title(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = DaygridError;

    fn from_str(s: &str) -> Result<Self> {
        let err = || DaygridError::Parse(format!("invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_month() {
        assert!(Month::new(2024, 0).is_none());
        assert!(Month::new(2024, 13).is_none());
        assert!(Month::new(2024, 12).is_some());
    }

    #[test]
    fn test_year_range_is_bounded() {
        assert!(Month::new(MAX_YEAR + 1, 1).is_none());
        assert!(Month::new(0, 6).is_none());
        assert!("262142-12".parse::<Month>().is_err());

        let last = Month::new(MAX_YEAR, 12).unwrap();
        assert_eq!(last.last_day(), date(9999, 12, 31));
        assert_eq!(last.grid_end(), date(10000, 1, 1));
        assert_eq!(last.succ(), last);
        assert_eq!(Month::new(MIN_YEAR, 1).unwrap().pred().year(), MIN_YEAR);
    }

    #[test]
    fn test_containing_clamps_extreme_dates() {
        let top = Month::containing(NaiveDate::MAX);
        assert_eq!(top, Month::new(MAX_YEAR, 12).unwrap());
        assert!(top.grid_start() <= top.first_day());
        assert!(top.grid_end() >= top.last_day());
        assert_eq!(Month::containing(NaiveDate::MIN), Month::new(MIN_YEAR, 1).unwrap());
    }

    #[test]
    fn test_offset_wraps_years() {
        let dec = Month::new(2023, 12).unwrap();
        assert_eq!(dec.succ(), Month::new(2024, 1).unwrap());
        assert_eq!(Month::new(2024, 1).unwrap().pred(), dec);
        assert_eq!(dec.offset(-12), Month::new(2022, 12).unwrap());
        assert_eq!(dec.offset(25), Month::new(2026, 1).unwrap());
    }

    #[test]
    fn test_last_day_handles_leap_years() {
        assert_eq!(Month::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
        assert_eq!(Month::new(2023, 2).unwrap().last_day(), date(2023, 2, 28));
        assert_eq!(Month::new(2024, 12).unwrap().last_day(), date(2024, 12, 31));
    }

    #[test]
    fn test_grid_bounds_are_sunday_to_saturday() {
        let march = Month::new(2024, 3).unwrap();
        assert_eq!(march.grid_start(), date(2024, 2, 25));
        assert_eq!(march.grid_end(), date(2024, 4, 6));
        assert_eq!(march.grid_start().weekday(), Weekday::Sun);
        assert_eq!(march.grid_end().weekday(), Weekday::Sat);
    }

    #[test]
    fn test_grid_bounds_when_month_starts_on_sunday() {
        // September 2024 starts on a Sunday and ends on a Monday
        let sept = Month::new(2024, 9).unwrap();
        assert_eq!(sept.grid_start(), date(2024, 9, 1));
        assert_eq!(sept.grid_end(), date(2024, 10, 5));
    }

    #[test]
    fn test_parse_and_display() {
        let m: Month = "2024-03".parse().unwrap();
        assert_eq!(m, Month::new(2024, 3).unwrap());
        assert_eq!(m.to_string(), "2024-03");
        assert_eq!(m.title(), "March 2024");
        assert!("2024-13".parse::<Month>().is_err());
        assert!("March".parse::<Month>().is_err());
    }

    #[test]
    fn test_day_clamped() {
        let feb = Month::new(2023, 2).unwrap();
        assert_eq!(feb.day_clamped(31), date(2023, 2, 28));
        assert_eq!(feb.day_clamped(0), date(2023, 2, 1));
    }

    #[test]
    fn test_containing_and_contains() {
        let d = date(2024, 3, 31);
        let m = Month::containing(d);
        assert!(m.contains(d));
        assert!(!m.contains(date(2024, 4, 1)));
    }
}
