//! JSON, CSV and iCalendar import/export of a [`DatepickerValue`].
//!
//! Every format round-trips: `from_x(&to_x(&v))` reproduces `v`. iCalendar has
//! second precision, so sub-second parts are dropped on that path only.

use chrono::{NaiveDate, NaiveDateTime};

use crate::date::{self, CalendarDate};
use crate::error::{DatepickerError, Result};
use crate::value::DatepickerValue;

const CSV_HEADER: &str = "kind,start,end";
const ICS_STAMP: &str = "%Y%m%dT%H%M%S";
const PRODID: &str = "-//datepicker-engine//EN";

pub fn to_json(value: &DatepickerValue) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_json(json: &str) -> Result<DatepickerValue> {
    let value: DatepickerValue = serde_json::from_str(json)?;
    Ok(value.sanitized())
}

fn iso(d: &CalendarDate) -> String {
    d.naive().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// `kind,start,end` rows; a multiple value writes one row per date.
pub fn to_csv(value: &DatepickerValue) -> String {
    let mut rows = vec![CSV_HEADER.to_string()];
    match value {
        DatepickerValue::Empty => rows.push("empty,,".to_string()),
        DatepickerValue::Single { date } => rows.push(format!("single,{},", iso(date))),
        DatepickerValue::Range { start, end } => rows.push(format!(
            "range,{},{}",
            iso(start),
            end.as_ref().map(iso).unwrap_or_default()
        )),
        DatepickerValue::Multiple { dates } if dates.is_empty() => {
            rows.push("multiple,,".to_string())
        }
        DatepickerValue::Multiple { dates } => {
            rows.extend(dates.iter().map(|d| format!("multiple,{},", iso(d))));
        }
    }
    rows.join("\n") + "\n"
}

pub fn from_csv(csv: &str) -> Result<DatepickerValue> {
    let err = |message: String| DatepickerError::Import {
        format: "csv",
        message,
    };

    let mut lines = csv.lines().map(str::trim).filter(|l| !l.is_empty());
    match lines.next() {
        Some(header) if header.eq_ignore_ascii_case(CSV_HEADER) => {}
        other => return Err(err(format!("expected header '{}', got {:?}", CSV_HEADER, other))),
    }

    let mut kind: Option<String> = None;
    let mut collected: Vec<(Option<CalendarDate>, Option<CalendarDate>)> = Vec::new();
    for (n, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(err(format!("row {}: expected 3 fields, got {}", n + 2, fields.len())));
        }
        let row_kind = fields[0].to_ascii_lowercase();
        if kind.is_none() {
            kind = Some(row_kind.clone());
        }
        if kind.as_deref() != Some(row_kind.as_str()) {
            return Err(err(format!("row {}: mixed kinds in one value", n + 2)));
        }
        let cell = |s: &str| -> Result<Option<CalendarDate>> {
            if s.is_empty() {
                return Ok(None);
            }
            date::parse(s)
                .map(Some)
                .ok_or_else(|| err(format!("row {}: unparseable date '{}'", n + 2, s)))
        };
        collected.push((cell(fields[1])?, cell(fields[2])?));
    }

    let first_start = || collected.first().and_then(|(s, _)| *s);
    let value = match kind.as_deref() {
        None | Some("empty") => DatepickerValue::Empty,
        Some("single") => first_start()
            .map(DatepickerValue::single)
            .ok_or_else(|| err("single row without a date".to_string()))?,
        Some("range") => match collected.first() {
            Some((Some(start), Some(end))) => DatepickerValue::range(*start, *end),
            Some((Some(start), None)) => DatepickerValue::range_start(*start),
            _ => return Err(err("range row without a start".to_string())),
        },
        Some("multiple") => DatepickerValue::multiple(collected.iter().filter_map(|(s, _)| *s)),
        Some(other) => return Err(err(format!("unknown kind '{}'", other))),
    };
    Ok(value)
}

/// An iCalendar document with one all-day-or-timed VEVENT per date (a range is
/// one VEVENT spanning DTSTART..DTEND).
pub fn to_ics(value: &DatepickerValue) -> String {
    let kind = match value {
        DatepickerValue::Empty => "empty",
        DatepickerValue::Single { .. } => "single",
        DatepickerValue::Range { .. } => "range",
        DatepickerValue::Multiple { .. } => "multiple",
    };
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        format!("X-DATEPICKER-KIND:{}", kind),
    ];

    let events: Vec<(CalendarDate, Option<CalendarDate>)> = match value {
        DatepickerValue::Empty => Vec::new(),
        DatepickerValue::Single { date } => vec![(*date, None)],
        DatepickerValue::Range { start, end } => vec![(*start, *end)],
        DatepickerValue::Multiple { dates } => dates.iter().map(|d| (*d, None)).collect(),
    };
    for (i, (start, end)) in events.iter().enumerate() {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}-{}@datepicker-engine", kind, i));
        lines.push(format!("DTSTART:{}", start.naive().format(ICS_STAMP)));
        if let Some(end) = end {
            lines.push(format!("DTEND:{}", end.naive().format(ICS_STAMP)));
        }
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n") + "\r\n"
}

pub fn from_ics(ics: &str) -> Result<DatepickerValue> {
    let err = |message: String| DatepickerError::Import {
        format: "ics",
        message,
    };

    let lines = unfold(ics);
    if lines.first().map(String::as_str) != Some("BEGIN:VCALENDAR") {
        return Err(err("missing BEGIN:VCALENDAR".to_string()));
    }

    let mut kind: Option<String> = None;
    let mut events: Vec<(Option<CalendarDate>, Option<CalendarDate>)> = Vec::new();
    let mut current: Option<(Option<CalendarDate>, Option<CalendarDate>)> = None;

    for line in &lines {
        let Some((head, body)) = line.split_once(':') else {
            continue;
        };
        let name = head.split(';').next().unwrap_or(head).to_ascii_uppercase();
        match (name.as_str(), body) {
            ("BEGIN", "VEVENT") => current = Some((None, None)),
            ("END", "VEVENT") => {
                if let Some(event) = current.take() {
                    events.push(event);
                }
            }
            ("X-DATEPICKER-KIND", k) => kind = Some(k.trim().to_ascii_lowercase()),
            ("DTSTART", v) => {
                let parsed = parse_ics_stamp(v)
                    .ok_or_else(|| err(format!("unparseable DTSTART '{}'", v)))?;
                if let Some(event) = current.as_mut() {
                    event.0 = Some(parsed);
                }
            }
            ("DTEND", v) => {
                let parsed =
                    parse_ics_stamp(v).ok_or_else(|| err(format!("unparseable DTEND '{}'", v)))?;
                if let Some(event) = current.as_mut() {
                    event.1 = Some(parsed);
                }
            }
            _ => {}
        }
    }

    let kind = kind.unwrap_or_else(|| match events.as_slice() {
        [] => "empty".to_string(),
        [(_, Some(_))] => "range".to_string(),
        [_] => "single".to_string(),
        _ => "multiple".to_string(),
    });

    let starts = || events.iter().filter_map(|(s, _)| *s);
    let value = match kind.as_str() {
        "empty" => DatepickerValue::Empty,
        "single" => starts()
            .next()
            .map(DatepickerValue::single)
            .ok_or_else(|| err("single value without DTSTART".to_string()))?,
        "range" => match events.first() {
            Some((Some(start), Some(end))) => DatepickerValue::range(*start, *end),
            Some((Some(start), None)) => DatepickerValue::range_start(*start),
            _ => return Err(err("range value without DTSTART".to_string())),
        },
        "multiple" => DatepickerValue::multiple(starts()),
        other => return Err(err(format!("unknown X-DATEPICKER-KIND '{}'", other))),
    };
    Ok(value)
}

/// Split into logical lines, joining RFC 5545 folded continuations.
fn unfold(ics: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in ics.lines() {
        let raw = raw.trim_end_matches('\r');
        if let Some(rest) = raw.strip_prefix([' ', '\t']) {
            if let Some(last) = out.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        if !raw.trim().is_empty() {
            out.push(raw.trim().to_string());
        }
    }
    out
}

fn parse_ics_stamp(v: &str) -> Option<CalendarDate> {
    let v = v.trim().trim_end_matches('Z');
    if let Ok(dt) = NaiveDateTime::parse_from_str(v, ICS_STAMP) {
        return Some(CalendarDate::from_naive(dt));
    }
    NaiveDate::parse_from_str(v, "%Y%m%d")
        .ok()
        .map(CalendarDate::from_date)
}
