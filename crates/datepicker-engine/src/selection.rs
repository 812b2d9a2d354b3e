//! Selection state and its transitions, independent of constraints and events.
//!
//! [`SelectionState`] is the per-mode state machine:
//!
//! - single: `NoSelection` / `HasSelection(date)`
//! - range: `Empty` -> `HasStart` -> `HasStartAndEnd`, where a click before the
//!   start restarts the range and a click on the start is ignored
//! - multiple: a day-unique ascending set with toggle semantics
//!
//! Callers pass dates that have already been checked for selectability and
//! stamped with the time of day; [`crate::Datepicker`] does both and turns the
//! returned [`Transition`] into notifications.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constraints::DateRange;
use crate::date::CalendarDate;
use crate::time::TimeOfDay;
use crate::value::{sort_unique_days, DatepickerValue, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Single {
        selected: Option<CalendarDate>,
    },
    Range {
        start: Option<CalendarDate>,
        end: Option<CalendarDate>,
        /// Candidate end under the pointer; render-only.
        hovered: Option<NaiveDate>,
    },
    Multiple {
        dates: Vec<CalendarDate>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePhase {
    Empty,
    HasStart,
    HasStartAndEnd,
}

/// What a click did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Selected(CalendarDate),
    Deselected(CalendarDate),
    /// A range was (re)started; not a committed change.
    RangeStarted(CalendarDate),
    RangeCompleted {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl SelectionState {
    pub fn empty(mode: Mode) -> Self {
        match mode {
            Mode::Single => SelectionState::Single { selected: None },
            Mode::Range => SelectionState::Range {
                start: None,
                end: None,
                hovered: None,
            },
            Mode::Multiple => SelectionState::Multiple { dates: Vec::new() },
        }
    }

    /// State holding `value`, reshaped for `mode`.
    pub fn from_value(value: DatepickerValue, mode: Mode) -> Self {
        match value.coerce(mode) {
            DatepickerValue::Empty => Self::empty(mode),
            DatepickerValue::Single { date } => SelectionState::Single {
                selected: Some(date),
            },
            DatepickerValue::Range { start, end } => SelectionState::Range {
                start: Some(start),
                end,
                hovered: None,
            },
            DatepickerValue::Multiple { dates } => SelectionState::Multiple { dates },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            SelectionState::Single { .. } => Mode::Single,
            SelectionState::Range { .. } => Mode::Range,
            SelectionState::Multiple { .. } => Mode::Multiple,
        }
    }

    /// The canonical value; `Empty` whenever nothing is selected.
    pub fn value(&self) -> DatepickerValue {
        match self {
            SelectionState::Single { selected: Some(d) } => DatepickerValue::single(*d),
            SelectionState::Range {
                start: Some(start),
                end,
                ..
            } => DatepickerValue::Range {
                start: *start,
                end: *end,
            },
            SelectionState::Multiple { dates } if !dates.is_empty() => DatepickerValue::Multiple {
                dates: dates.clone(),
            },
            _ => DatepickerValue::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value().is_empty()
    }

    pub fn range_phase(&self) -> Option<RangePhase> {
        match self {
            SelectionState::Range { start: None, .. } => Some(RangePhase::Empty),
            SelectionState::Range {
                start: Some(_),
                end: None,
                ..
            } => Some(RangePhase::HasStart),
            SelectionState::Range { .. } => Some(RangePhase::HasStartAndEnd),
            _ => None,
        }
    }

    /// Apply a click on an already-validated, already-stamped date.
    pub fn click(&mut self, date: CalendarDate) -> Transition {
        match self {
            SelectionState::Single { selected } => {
                *selected = Some(date);
                Transition::Selected(date)
            }
            SelectionState::Range {
                start,
                end,
                hovered,
            } => match (*start, *end) {
                (Some(s), None) => {
                    if date.date() == s.date() {
                        return Transition::Unchanged;
                    }
                    *hovered = None;
                    if date.date() < s.date() {
                        *start = Some(date);
                        Transition::RangeStarted(date)
                    } else {
                        *end = Some(date);
                        Transition::RangeCompleted { start: s, end: date }
                    }
                }
                _ => {
                    *start = Some(date);
                    *end = None;
                    *hovered = None;
                    Transition::RangeStarted(date)
                }
            },
            SelectionState::Multiple { dates } => {
                match dates.iter().position(|d| d.same_day(&date)) {
                    Some(i) => Transition::Deselected(dates.remove(i)),
                    None => {
                        let at = dates.partition_point(|d| d < &date);
                        dates.insert(at, date);
                        Transition::Selected(date)
                    }
                }
            }
        }
    }

    /// Track the pointer while a range awaits its end. Ignored otherwise.
    pub fn hover(&mut self, day: Option<NaiveDate>) {
        if let SelectionState::Range {
            start: Some(_),
            end: None,
            hovered,
        } = self
        {
            *hovered = day;
        }
    }

    /// Days the hover preview covers: start through the hovered day, when the
    /// hovered day lies after the start.
    pub fn preview(&self) -> Option<DateRange> {
        match self {
            SelectionState::Range {
                start: Some(start),
                end: None,
                hovered: Some(h),
            } if *h > start.date() => Some(DateRange::new(start.date(), *h)),
            _ => None,
        }
    }

    /// Set a complete range in one step (presets).
    pub fn set_range(
        &mut self,
        a: CalendarDate,
        b: CalendarDate,
    ) -> Option<(CalendarDate, CalendarDate)> {
        let SelectionState::Range {
            start,
            end,
            hovered,
        } = self
        else {
            return None;
        };
        let (s, e) = if b < a { (b, a) } else { (a, b) };
        *start = Some(s);
        *end = Some(e);
        *hovered = None;
        Some((s, e))
    }

    /// Replace a multiple selection wholesale.
    pub fn replace_all(&mut self, new_dates: Vec<CalendarDate>) -> bool {
        match self {
            SelectionState::Multiple { dates } => {
                *dates = sort_unique_days(new_dates);
                true
            }
            _ => false,
        }
    }

    /// Re-apply `time` to every selected date. Returns whether anything is selected.
    pub fn restamp(&mut self, time: TimeOfDay) -> bool {
        match self {
            SelectionState::Single { selected } => {
                *selected = selected.map(|d| time.stamp(d));
                selected.is_some()
            }
            SelectionState::Range { start, end, .. } => {
                *start = start.map(|d| time.stamp(d));
                *end = end.map(|d| time.stamp(d));
                start.is_some()
            }
            SelectionState::Multiple { dates } => {
                for d in dates.iter_mut() {
                    *d = time.stamp(*d);
                }
                !dates.is_empty()
            }
        }
    }

    pub fn is_selected(&self, day: NaiveDate) -> bool {
        match self {
            SelectionState::Single { selected } => selected.is_some_and(|d| d.date() == day),
            SelectionState::Range { start, end, .. } => {
                start.is_some_and(|d| d.date() == day) || end.is_some_and(|d| d.date() == day)
            }
            SelectionState::Multiple { dates } => dates.iter().any(|d| d.date() == day),
        }
    }

    /// The committed range as calendar days, when both ends are set.
    pub fn committed_range(&self) -> Option<DateRange> {
        match self {
            SelectionState::Range {
                start: Some(s),
                end: Some(e),
                ..
            } => Some(DateRange::new(s.date(), e.date())),
            _ => None,
        }
    }

    pub fn range_start(&self) -> Option<NaiveDate> {
        match self {
            SelectionState::Range { start, .. } => start.map(|d| d.date()),
            _ => None,
        }
    }
}

/// A named range that can be applied in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePreset {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RangePreset {
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Today, Yesterday, Last 7 days, Last 30 days, This month, Last month.
    pub fn defaults(today: NaiveDate) -> Vec<RangePreset> {
        use chrono::Datelike;

        let first_of_month = today.with_day(1).unwrap_or(today);
        let last_of_month = crate::date::shift_months(first_of_month, 1)
            .pred_opt()
            .unwrap_or(today);
        let first_of_last = crate::date::shift_months(first_of_month, -1);
        let last_of_last = first_of_month.pred_opt().unwrap_or(first_of_last);
        // Clamped at the first representable day.
        let back = |days: i64| crate::date::offset_days(today, -days).unwrap_or(NaiveDate::MIN);
        let yesterday = back(1);

        vec![
            RangePreset::new("Today", today, today),
            RangePreset::new("Yesterday", yesterday, yesterday),
            RangePreset::new("Last 7 days", back(6), today),
            RangePreset::new("Last 30 days", back(29), today),
            RangePreset::new("This month", first_of_month, last_of_month),
            RangePreset::new("Last month", first_of_last, last_of_last),
        ]
    }
}

/// Discriminated description of a committed change or view update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DatepickerAction {
    /// `selected` is false when a multiple-mode click toggled the date off.
    DateSelected { date: CalendarDate, selected: bool },
    RangeSelected { start: CalendarDate, end: CalendarDate },
    TimeChanged { hour: u32, minute: u32 },
    Clear,
    MonthChanged { year: i32, month: u32 },
    CalendarGenerated { year: i32, month: u32, cells: usize },
    RecurrenceApplied { anchor: NaiveDate, dates: Vec<CalendarDate> },
}

/// Notifications queued by the picker for the host to drain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum DatepickerEvent {
    ValueChanged(DatepickerValue),
    Action(DatepickerAction),
    DisabledChanged(bool),
}
