//! Display formatting with locale names and optional timezone conversion.

use std::fmt::{self, Write};

use chrono::{Datelike, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::date::CalendarDate;
use crate::locale::ResolvedLocale;
use crate::value::DatepickerValue;

pub const RANGE_SEPARATOR: &str = " – ";
pub const LIST_SEPARATOR: &str = ", ";

/// Format `date` with a strftime `pattern`.
///
/// `%B`, `%b`, `%A` and `%a` are replaced by the locale's names. With `tz`,
/// the date is read as UTC and shown in that zone (so `%Z`/`%z` work too).
/// An unusable pattern falls back to the ISO form of the date.
pub fn format_date(
    date: &CalendarDate,
    pattern: &str,
    locale: &ResolvedLocale,
    tz: Option<Tz>,
) -> String {
    let rendered = match tz {
        Some(tz) => {
            let zoned = tz.from_utc_datetime(&date.naive());
            let localized = localize_pattern(pattern, &zoned.naive_local(), locale);
            render(zoned.format(&localized))
        }
        None => {
            let localized = localize_pattern(pattern, &date.naive(), locale);
            render(date.naive().format(&localized))
        }
    };
    rendered.unwrap_or_else(|| date.to_string())
}

/// Format a whole value; see [`join_value`] for the layout.
pub fn format_value(
    value: &DatepickerValue,
    pattern: &str,
    locale: &ResolvedLocale,
    tz: Option<Tz>,
) -> String {
    join_value(value, |d| format_date(d, pattern, locale, tz))
}

/// Lay out a value using `f` for each date: ranges as `start – end` (an open
/// range ends with the separator), sets comma-separated, empty as `""`.
pub fn join_value(value: &DatepickerValue, f: impl Fn(&CalendarDate) -> String) -> String {
    match value {
        DatepickerValue::Empty => String::new(),
        DatepickerValue::Single { date } => f(date),
        DatepickerValue::Range { start, end } => {
            let mut out = f(start);
            out.push_str(RANGE_SEPARATOR);
            if let Some(end) = end {
                out.push_str(&f(end));
            }
            out
        }
        DatepickerValue::Multiple { dates } => dates
            .iter()
            .map(&f)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
    }
}

/// Run a chrono format, returning `None` instead of panicking on a bad pattern.
pub(crate) fn render(formatted: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", formatted).ok()?;
    Some(out)
}

fn localize_pattern(pattern: &str, dt: &NaiveDateTime, locale: &ResolvedLocale) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let name = match chars.peek().copied() {
            Some('B') => locale.month_name(dt.month()),
            Some('b') => locale.month_name_short(dt.month()),
            Some('A') => locale.weekday_name(dt.weekday()),
            Some('a') => locale.weekday_name_short(dt.weekday()),
            Some(other) => {
                chars.next();
                out.push('%');
                out.push(other);
                continue;
            }
            None => {
                out.push_str("%%");
                continue;
            }
        };
        chars.next();
        for ch in name.chars() {
            if ch == '%' {
                out.push_str("%%");
            } else {
                out.push(ch);
            }
        }
    }
    out
}
