//! Tests for date normalization: every input shape either becomes a
//! `CalendarDate` or `None`, never an error.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use datepicker_engine::date::{days_in_month, parse, shift_months};
use datepicker_engine::{normalize, CalendarDate, DateInput, DateLike};

fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> CalendarDate {
    CalendarDate::from_ymd_hms(y, m, d, h, min, s).unwrap()
}

/// Stand-in for a third-party date object exposing `toDate()`.
struct MomentLike(Option<NaiveDateTime>);

impl DateLike for MomentLike {
    fn to_date(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Absent and invalid input
// ---------------------------------------------------------------------------

#[test]
fn null_is_none() {
    assert_eq!(normalize(DateInput::Null), None);
}

#[test]
fn nan_timestamp_is_none() {
    assert_eq!(normalize(DateInput::Timestamp(f64::NAN)), None);
    assert_eq!(normalize(DateInput::Timestamp(f64::INFINITY)), None);
}

#[test]
fn garbage_text_is_none() {
    assert_eq!(normalize(DateInput::Text("not a date")), None);
    assert_eq!(normalize(DateInput::Text("")), None);
    assert_eq!(normalize(DateInput::Text("   ")), None);
}

#[test]
fn impossible_calendar_day_is_none() {
    assert_eq!(normalize(DateInput::Text("2024-02-30")), None);
    assert_eq!(normalize(DateInput::Text("2023-02-29")), None);
}

#[test]
fn invalid_date_like_is_none() {
    let broken = MomentLike(None);
    assert_eq!(normalize(DateInput::Like(&broken)), None);
}

// ---------------------------------------------------------------------------
// Accepted shapes
// ---------------------------------------------------------------------------

#[test]
fn native_datetime_is_preserved() {
    let dt = ymd_hms(2024, 6, 15, 10, 30, 5).naive();
    assert_eq!(normalize(DateInput::Native(dt)).unwrap().naive(), dt);
}

#[test]
fn utc_datetime_uses_utc_wall_clock() {
    let dt = Utc.with_ymd_and_hms(2024, 6, 15, 23, 0, 0).unwrap();
    assert_eq!(
        normalize(DateInput::Utc(dt)),
        Some(ymd_hms(2024, 6, 15, 23, 0, 0))
    );
}

#[test]
fn epoch_timestamp_in_millis() {
    assert_eq!(
        normalize(DateInput::Timestamp(0.0)),
        Some(ymd(1970, 1, 1))
    );
    // 2024-06-15T00:00:00Z
    assert_eq!(
        normalize(DateInput::Timestamp(1_718_409_600_000.0)),
        Some(ymd(2024, 6, 15))
    );
}

#[test]
fn date_only_strings_are_midnight() {
    assert_eq!(parse("2024-06-15"), Some(ymd(2024, 6, 15)));
    assert_eq!(parse("2024/06/15"), Some(ymd(2024, 6, 15)));
    assert_eq!(parse("06/15/2024"), Some(ymd(2024, 6, 15)));
}

#[test]
fn local_datetime_strings() {
    assert_eq!(parse("2024-06-15T10:30:00"), Some(ymd_hms(2024, 6, 15, 10, 30, 0)));
    assert_eq!(parse("2024-06-15T10:30"), Some(ymd_hms(2024, 6, 15, 10, 30, 0)));
    assert_eq!(parse("2024-06-15 08:05:09"), Some(ymd_hms(2024, 6, 15, 8, 5, 9)));
}

#[test]
fn fractional_seconds_are_kept() {
    let parsed = parse("2024-06-15T10:30:00.250").unwrap();
    assert_eq!(parsed.naive().and_utc().timestamp_subsec_millis(), 250);
}

#[test]
fn offset_strings_convert_to_utc() {
    assert_eq!(
        parse("2024-06-15T02:00:00+05:00"),
        Some(ymd_hms(2024, 6, 14, 21, 0, 0))
    );
    assert_eq!(
        parse("2024-06-15T02:00:00Z"),
        Some(ymd_hms(2024, 6, 15, 2, 0, 0))
    );
}

#[test]
fn date_like_objects_are_unwrapped() {
    let m = MomentLike(Some(ymd_hms(2024, 1, 2, 3, 4, 5).naive()));
    assert_eq!(
        normalize(DateInput::Like(&m)),
        Some(ymd_hms(2024, 1, 2, 3, 4, 5))
    );
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize(DateInput::Text("2024-06-15T10:30:00")).unwrap();
    let twice = normalize(DateInput::Native(once.naive())).unwrap();
    assert_eq!(once, twice);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[test]
fn start_and_end_of_day() {
    let d = ymd_hms(2024, 6, 15, 10, 30, 0);
    assert_eq!(d.start_of_day(), ymd(2024, 6, 15));
    let end = d.end_of_day();
    assert_eq!(end.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    assert_eq!((end.hour(), end.minute()), (23, 59));
    assert!(end > d);
}

#[test]
fn add_months_clamps_to_month_end() {
    assert_eq!(ymd(2024, 1, 31).add_months(1), ymd(2024, 2, 29));
    assert_eq!(ymd(2023, 1, 31).add_months(1), ymd(2023, 2, 28));
    assert_eq!(ymd(2024, 3, 31).add_months(-1), ymd(2024, 2, 29));
    assert_eq!(ymd(2024, 12, 15).add_months(1), ymd(2025, 1, 15));
}

#[test]
fn add_days_crosses_months() {
    assert_eq!(ymd(2024, 2, 28).add_days(2), Some(ymd(2024, 3, 1)));
    assert_eq!(ymd(2024, 1, 1).add_days(-1), Some(ymd(2023, 12, 31)));
    assert_eq!(ymd(2024, 1, 1).add_days(i64::MAX), None);
    assert_eq!(ymd(2024, 1, 1).add_days(200_000_000), None);
}

#[test]
fn with_time_keeps_the_day() {
    let d = ymd_hms(2024, 6, 15, 1, 2, 3).with_time(14, 45);
    assert_eq!(d, ymd_hms(2024, 6, 15, 14, 45, 0));
    // Out-of-range time leaves the date untouched.
    assert_eq!(d.with_time(25, 0), d);
}

#[test]
fn shift_months_on_plain_dates() {
    let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    assert_eq!(
        shift_months(jan31, 1),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(days_in_month(2024, 6), 30);
}
