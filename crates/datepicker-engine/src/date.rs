//! Date normalization -- converts heterogeneous date inputs into [`CalendarDate`].
//!
//! Hosts hand the engine native datetimes, epoch timestamps, ISO-ish strings, or
//! objects from third-party date libraries. Everything crosses into the engine
//! through [`normalize`], which collapses anything it cannot interpret to `None`
//! instead of raising a parse error.

use std::fmt;

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};

/// A normalized point in time (year through millisecond) on the engine's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDateTime);

impl CalendarDate {
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Midnight on the given calendar day.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }

    /// Midnight on `year-month-day`, or `None` for an impossible date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_date)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(Self)
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// The calendar day, discarding time of day.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn start_of_day(&self) -> Self {
        Self::from_date(self.date())
    }

    /// 23:59:59.999 on the same calendar day.
    pub fn end_of_day(&self) -> Self {
        let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Self(self.date().and_time(end))
    }

    /// `None` when the result falls outside chrono's representable range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Shift by whole months, clamping the day to the target month's length
    /// (Jan 31 + 1 month is Feb 28/29).
    pub fn add_months(&self, months: i32) -> Self {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        Self(shifted.unwrap_or(self.0))
    }

    /// Same calendar day with hour and minute replaced; seconds are zeroed.
    pub fn with_time(&self, hour: u32, minute: u32) -> Self {
        match NaiveTime::from_hms_opt(hour, minute, 0) {
            Some(t) => Self(self.date().and_time(t)),
            None => *self,
        }
    }

    pub fn same_day(&self, other: &CalendarDate) -> bool {
        self.date() == other.date()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<NaiveDateTime> for CalendarDate {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

/// Capability exposed by third-party date objects that can convert themselves
/// into a native datetime (the `toDate()` convention of JS date libraries).
pub trait DateLike {
    /// `None` when the wrapped value is itself invalid.
    fn to_date(&self) -> Option<NaiveDateTime>;
}

/// Every shape of date input a host may hand the engine.
#[derive(Clone, Copy)]
pub enum DateInput<'a> {
    Null,
    Native(NaiveDateTime),
    Utc(DateTime<Utc>),
    /// Milliseconds since the Unix epoch; NaN marks an invalid date.
    Timestamp(f64),
    Text(&'a str),
    Like(&'a dyn DateLike),
}

impl fmt::Debug for DateInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateInput::Null => write!(f, "Null"),
            DateInput::Native(dt) => write!(f, "Native({dt})"),
            DateInput::Utc(dt) => write!(f, "Utc({dt})"),
            DateInput::Timestamp(ms) => write!(f, "Timestamp({ms})"),
            DateInput::Text(s) => write!(f, "Text({s:?})"),
            DateInput::Like(_) => write!(f, "Like(..)"),
        }
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateInput::Native(dt)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(d: NaiveDate) -> Self {
        DateInput::Native(d.and_time(NaiveTime::MIN))
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Normalize any supported input into a [`CalendarDate`].
///
/// Invalid or absent input yields `None`; there is no distinction between a
/// missing value and one that failed to parse.
pub fn normalize(input: DateInput<'_>) -> Option<CalendarDate> {
    match input {
        DateInput::Null => None,
        DateInput::Native(dt) => Some(CalendarDate(dt)),
        DateInput::Utc(dt) => Some(CalendarDate(dt.naive_utc())),
        DateInput::Timestamp(ms) => {
            if !ms.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis(ms as i64).map(|dt| CalendarDate(dt.naive_utc()))
        }
        DateInput::Text(s) => parse_text(s),
        DateInput::Like(like) => like.to_date().map(CalendarDate),
    }
}

/// Shorthand for `normalize(DateInput::Text(s))`.
pub fn parse(s: &str) -> Option<CalendarDate> {
    parse_text(s)
}

fn parse_text(raw: &str) -> Option<CalendarDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Offset-bearing strings are converted to UTC wall-clock time.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(CalendarDate(dt.naive_utc()));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(CalendarDate(dt));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(CalendarDate::from_date(d));
        }
    }

    None
}

/// Number of days in `month` of `year`; 0 when the month does not exist
/// (bad month number, or a year outside chrono's range).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
        .unwrap_or(0)
}

/// Add a signed number of days, or `None` past the representable range.
pub fn offset_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Add a signed number of months, clamping the day to the target month's
/// length. `None` past the representable range.
pub fn checked_shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

/// Add a signed number of months to a calendar day, clamping to month end.
/// Out-of-range results leave the date unchanged.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    checked_shift_months(date, months).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn days_in_month_is_zero_for_missing_months() {
        assert_eq!(days_in_month(2024, 13), 0);
        assert_eq!(days_in_month(300_000, 6), 0);
    }

    #[test]
    fn parse_text_ignores_surrounding_whitespace() {
        assert_eq!(parse("  2024-06-15 "), CalendarDate::from_ymd(2024, 6, 15));
    }
}
