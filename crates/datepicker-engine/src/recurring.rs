//! Recurring date generation -- expands a [`RecurringPattern`] into concrete days.
//!
//! Patterns are translated into an RFC 5545 RRULE and expanded with the `rrule`
//! crate in UTC at midnight, so every generated date is already start-of-day.
//! Generation is eager and always bounded: an explicit occurrence count wins,
//! an end date caps at [`BOUNDED_CAP`] instances, and a pattern with neither
//! stops after [`UNBOUNDED_CAP`].

use chrono::{Datelike, NaiveDate, Weekday};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::date::{days_in_month, CalendarDate};
use crate::error::{DatepickerError, Result};

/// Instance cap when only an end date bounds the pattern.
pub const BOUNDED_CAP: u16 = 365;

/// Instance cap when neither a count nor an end date is given.
pub const UNBOUNDED_CAP: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    pub pattern: RecurrenceKind,
    /// When used as a picker's configured pattern, the clicked day replaces this.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub occurrences: Option<u32>,
    /// Weekly anchor; defaults to the start date's weekday.
    #[serde(default)]
    pub day_of_week: Option<Weekday>,
    /// Monthly anchor; defaults to the start date's day of month.
    #[serde(default)]
    pub day_of_month: Option<u32>,
    /// Yearly anchor; defaults to the start date's month and day.
    #[serde(default)]
    pub month_and_day: Option<MonthDay>,
    #[serde(default = "default_interval")]
    pub interval: u32,
}

fn default_interval() -> u32 {
    1
}

impl RecurringPattern {
    pub fn new(pattern: RecurrenceKind, start: NaiveDate) -> Self {
        Self {
            pattern,
            start_date: Some(start),
            end_date: None,
            occurrences: None,
            day_of_week: None,
            day_of_month: None,
            month_and_day: None,
            interval: 1,
        }
    }

    pub fn interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn occurrences(mut self, count: u32) -> Self {
        self.occurrences = Some(count);
        self
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn on_weekday(mut self, day: Weekday) -> Self {
        self.day_of_week = Some(day);
        self
    }

    pub fn on_day_of_month(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn on_month_day(mut self, month: u32, day: u32) -> Self {
        self.month_and_day = Some(MonthDay { month, day });
        self
    }

    /// A copy anchored at `start`.
    pub fn starting(&self, start: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            ..self.clone()
        }
    }
}

/// Generate the dates of `pattern`.
///
/// Never fails: a pattern that cannot be expanded is logged and produces no dates.
pub fn generate(pattern: &RecurringPattern) -> Vec<CalendarDate> {
    match expand(pattern) {
        Ok(dates) => dates,
        Err(e) => {
            warn!(error = %e, ?pattern, "recurring pattern produced no dates");
            Vec::new()
        }
    }
}

/// Expand `pattern` into concrete start-of-day dates.
///
/// # Errors
/// Returns `DatepickerError::InvalidRecurrence` if the pattern has no start
/// date, asks for more than `u16::MAX` occurrences, or the generated RRULE is
/// rejected.
pub fn expand(pattern: &RecurringPattern) -> Result<Vec<CalendarDate>> {
    let start = pattern
        .start_date
        .ok_or_else(|| DatepickerError::InvalidRecurrence("missing start date".to_string()))?;

    if pattern.occurrences == Some(0) {
        return Ok(Vec::new());
    }
    if pattern.end_date.is_some_and(|end| end < start) {
        return Ok(Vec::new());
    }

    let mut rule = to_rrule(pattern, start);
    let limit = match (pattern.occurrences, pattern.end_date) {
        (Some(count), _) => {
            let limit = u16::try_from(count).map_err(|_| {
                DatepickerError::InvalidRecurrence(format!(
                    "occurrences {} exceeds {}",
                    count,
                    u16::MAX
                ))
            })?;
            rule.push_str(&format!(";COUNT={}", count));
            limit
        }
        (None, Some(end)) => {
            // Occurrences all fall at midnight, so an UNTIL of midnight on the
            // end day is inclusive of it.
            rule.push_str(&format!(";UNTIL={}T000000Z", end.format("%Y%m%d")));
            BOUNDED_CAP
        }
        (None, None) => UNBOUNDED_CAP,
    };

    let text = format!(
        "DTSTART;TZID=UTC:{}T000000\nRRULE:{}",
        start.format("%Y%m%d"),
        rule
    );
    let set: RRuleSet = text
        .parse()
        .map_err(|e| DatepickerError::InvalidRecurrence(format!("{}: {}", rule, e)))?;

    let mut dates: Vec<CalendarDate> = set
        .all(limit)
        .dates
        .into_iter()
        .map(|dt| CalendarDate::from_date(dt.naive_local().date()))
        .collect();

    // A count takes precedence over the end date, but the end date still bounds it.
    if let (Some(_), Some(end)) = (pattern.occurrences, pattern.end_date) {
        dates.retain(|d| d.date() <= end);
    }
    dates.truncate(usize::from(limit));

    debug!(rule = %rule, generated = dates.len(), "expanded recurring pattern");
    Ok(dates)
}

/// The RRULE body (without COUNT/UNTIL) describing `pattern` anchored at `start`.
pub fn to_rrule(pattern: &RecurringPattern, start: NaiveDate) -> String {
    let interval = pattern.interval.max(1);
    match pattern.pattern {
        RecurrenceKind::Daily => format!("FREQ=DAILY;INTERVAL={}", interval),
        RecurrenceKind::Weekly => {
            let day = pattern.day_of_week.unwrap_or_else(|| start.weekday());
            format!("FREQ=WEEKLY;INTERVAL={};BYDAY={}", interval, byday(day))
        }
        RecurrenceKind::Monthly => {
            let day = pattern.day_of_month.unwrap_or_else(|| start.day());
            format!("FREQ=MONTHLY;INTERVAL={};{}", interval, clamped_month_day(day, 31))
        }
        RecurrenceKind::Yearly => {
            let anchor = pattern.month_and_day.unwrap_or(MonthDay {
                month: start.month(),
                day: start.day(),
            });
            let month = anchor.month.clamp(1, 12);
            // Leap-year length, so Feb 29 survives and clamps to Feb 28 elsewhere.
            let longest = days_in_month(2024, month);
            format!(
                "FREQ=YEARLY;INTERVAL={};BYMONTH={};{}",
                interval,
                month,
                clamped_month_day(anchor.day, longest)
            )
        }
        RecurrenceKind::Weekdays => "FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR".to_string(),
        RecurrenceKind::Weekends => "FREQ=DAILY;BYDAY=SA,SU".to_string(),
    }
}

/// `BYMONTHDAY` selecting `day`, or the month's last day when it is shorter.
///
/// Days past 28 are expressed as "the last of 28..=day that exists", so a
/// target of 31 lands on Feb 28/29, Apr 30, and so on instead of skipping
/// the month.
fn clamped_month_day(day: u32, longest: u32) -> String {
    let day = day.clamp(1, longest);
    if day <= 28 {
        return format!("BYMONTHDAY={}", day);
    }
    let candidates: Vec<String> = (28..=day).map(|d| d.to_string()).collect();
    format!("BYMONTHDAY={};BYSETPOS=-1", candidates.join(","))
}

fn byday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
