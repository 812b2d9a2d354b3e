//! The committed value exposed to hosts, and the selection mode that shapes it.

use serde::{Deserialize, Serialize};

use crate::date::{normalize, CalendarDate, DateInput};

/// Selection cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Range,
    Multiple,
}

/// Canonical selection value. The variant in use follows the picker's [`Mode`].
///
/// Invariants maintained by every constructor:
/// - `Range`: `start <= end` once `end` is set.
/// - `Multiple`: ascending, at most one entry per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DatepickerValue {
    #[default]
    Empty,
    Single {
        date: CalendarDate,
    },
    Range {
        start: CalendarDate,
        end: Option<CalendarDate>,
    },
    Multiple {
        dates: Vec<CalendarDate>,
    },
}

impl DatepickerValue {
    pub fn single(date: CalendarDate) -> Self {
        DatepickerValue::Single { date }
    }

    /// A range with both ends set; inverted bounds are swapped.
    pub fn range(start: CalendarDate, end: CalendarDate) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        DatepickerValue::Range {
            start,
            end: Some(end),
        }
    }

    /// A range awaiting its end.
    pub fn range_start(start: CalendarDate) -> Self {
        DatepickerValue::Range { start, end: None }
    }

    /// Sorted, day-unique set of dates. An empty input is still `Multiple`.
    pub fn multiple(dates: impl IntoIterator<Item = CalendarDate>) -> Self {
        DatepickerValue::Multiple {
            dates: sort_unique_days(dates.into_iter().collect()),
        }
    }

    /// Normalize a single host input; unusable input yields `Empty`.
    pub fn from_input(input: DateInput<'_>) -> Self {
        normalize(input).map(Self::single).unwrap_or_default()
    }

    /// Normalize a `[start, end]` pair of host inputs.
    pub fn from_range_inputs(start: DateInput<'_>, end: DateInput<'_>) -> Self {
        match (normalize(start), normalize(end)) {
            (Some(s), Some(e)) => Self::range(s, e),
            (Some(s), None) => Self::range_start(s),
            (None, _) => DatepickerValue::Empty,
        }
    }

    /// Normalize a list of host inputs, dropping the unusable ones.
    pub fn from_inputs<'a>(inputs: impl IntoIterator<Item = DateInput<'a>>) -> Self {
        Self::multiple(inputs.into_iter().filter_map(normalize))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DatepickerValue::Empty => true,
            DatepickerValue::Multiple { dates } => dates.is_empty(),
            _ => false,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            DatepickerValue::Empty => None,
            DatepickerValue::Single { .. } => Some(Mode::Single),
            DatepickerValue::Range { .. } => Some(Mode::Range),
            DatepickerValue::Multiple { .. } => Some(Mode::Multiple),
        }
    }

    /// Every date carried by the value, in order.
    pub fn dates(&self) -> Vec<CalendarDate> {
        match self {
            DatepickerValue::Empty => Vec::new(),
            DatepickerValue::Single { date } => vec![*date],
            DatepickerValue::Range { start, end } => {
                std::iter::once(*start).chain(*end).collect()
            }
            DatepickerValue::Multiple { dates } => dates.clone(),
        }
    }

    /// Reshape into the variant `mode` expects.
    ///
    /// Single dates become a one-element set or an open range; ranges keep
    /// their start for single mode; sets keep their first entry (single) or
    /// first and last entries (range).
    pub fn coerce(self, mode: Mode) -> Self {
        let dates = self.dates();
        match (mode, self) {
            (_, DatepickerValue::Empty) => DatepickerValue::Empty,
            (Mode::Single, DatepickerValue::Single { date }) => Self::single(date),
            (Mode::Range, v @ DatepickerValue::Range { .. }) => v.sanitized(),
            (Mode::Multiple, DatepickerValue::Multiple { dates }) => Self::multiple(dates),
            (Mode::Single, _) => dates
                .first()
                .copied()
                .map(Self::single)
                .unwrap_or_default(),
            (Mode::Range, _) => match (dates.first(), dates.last()) {
                (Some(&first), Some(&last)) if dates.len() > 1 => Self::range(first, last),
                (Some(&first), _) => Self::range_start(first),
                _ => DatepickerValue::Empty,
            },
            (Mode::Multiple, _) => Self::multiple(dates),
        }
    }

    /// Re-establish the variant's invariants on externally built data.
    pub fn sanitized(self) -> Self {
        match self {
            DatepickerValue::Range {
                start,
                end: Some(end),
            } => Self::range(start, end),
            DatepickerValue::Multiple { dates } => Self::multiple(dates),
            other => other,
        }
    }
}

/// Sort ascending and keep the earliest entry for each calendar day.
pub(crate) fn sort_unique_days(mut dates: Vec<CalendarDate>) -> Vec<CalendarDate> {
    dates.sort();
    dates.dedup_by(|later, earlier| later.same_day(earlier));
    dates
}

/// A host-side value binding (a form control, a signal, a store field).
///
/// The engine never subscribes to it; the host decides when to pull with
/// [`crate::Datepicker::sync_from`] and push with [`crate::Datepicker::publish_to`].
pub trait ValueSource {
    fn read(&self) -> DatepickerValue;

    fn write(&mut self, _value: &DatepickerValue) {}
}
