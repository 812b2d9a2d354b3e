//! Navigation state and the pure transition function over it.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date::{checked_shift_months, offset_days};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Month,
    Year,
    Decade,
    Timeline,
    TimeSlider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Which month is on screen, how it is shown, and where the keyboard cursor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub view_year: i32,
    /// 1..=12
    pub view_month: u32,
    pub view_mode: ViewMode,
    pub focused: Option<NaiveDate>,
}

impl NavigationState {
    /// Month view of the month containing `date`, with nothing focused.
    pub fn at(date: NaiveDate) -> Self {
        Self {
            view_year: date.year(),
            view_month: date.month(),
            view_mode: ViewMode::Month,
            focused: None,
        }
    }

    /// `None` only for a state built by hand with an impossible month.
    pub fn first_of_view(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.view_year, self.view_month, 1)
    }

    /// Whether two states show the same month.
    pub fn same_view(&self, other: &NavigationState) -> bool {
        self.view_year == other.view_year && self.view_month == other.view_month
    }

    /// The focused day, or the first of the visible month when nothing is focused.
    pub fn cursor(&self) -> Option<NaiveDate> {
        self.focused.or_else(|| self.first_of_view())
    }

    fn show(mut self, date: NaiveDate) -> Self {
        self.view_year = date.year();
        self.view_month = date.month();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavIntent {
    MonthDelta { months: i32 },
    YearDelta { years: i32 },
    GoTo { year: i32, month: u32 },
    SetViewMode { mode: ViewMode },
    MoveFocus { days: i64 },
    Focus { date: NaiveDate },
    FocusWeekStart,
    FocusWeekEnd,
    Swipe { direction: SwipeDirection },
}

/// Locale facts navigation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavContext {
    pub first_day: Weekday,
    pub rtl: bool,
}

impl Default for NavContext {
    fn default() -> Self {
        Self {
            first_day: Weekday::Sun,
            rtl: false,
        }
    }
}

/// Apply `intent` to `state`.
///
/// Moving the focus into another month brings that month into view, and
/// month/year steps carry the focus along (clamped to the target month's length).
/// An intent that would leave chrono's date range returns `state` unchanged.
pub fn handle(intent: NavIntent, state: &NavigationState, ctx: NavContext) -> NavigationState {
    let state = *state;
    match intent {
        NavIntent::MonthDelta { months } => shift_view(state, months),
        NavIntent::YearDelta { years } => shift_view(state, years.saturating_mul(12)),
        NavIntent::GoTo { year, month } => match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(first) => state.show(first),
            None => state,
        },
        NavIntent::SetViewMode { mode } => NavigationState {
            view_mode: mode,
            ..state
        },
        NavIntent::MoveFocus { days } => move_focus(state, |cursor| offset_days(cursor, days)),
        NavIntent::Focus { date } => focus(state, date),
        NavIntent::FocusWeekStart => move_focus(state, |cursor| {
            offset_days(cursor, -offset_in_week(cursor, ctx.first_day))
        }),
        NavIntent::FocusWeekEnd => move_focus(state, |cursor| {
            offset_days(cursor, 6 - offset_in_week(cursor, ctx.first_day))
        }),
        NavIntent::Swipe { direction } => {
            let forward = matches!(direction, SwipeDirection::Left) != ctx.rtl;
            shift_view(state, if forward { 1 } else { -1 })
        }
    }
}

fn shift_view(state: NavigationState, months: i32) -> NavigationState {
    let Some(shifted) = state
        .first_of_view()
        .and_then(|first| checked_shift_months(first, months))
    else {
        return state;
    };
    NavigationState {
        focused: state.focused.and_then(|f| checked_shift_months(f, months)),
        ..state.show(shifted)
    }
}

fn move_focus(
    state: NavigationState,
    target: impl FnOnce(NaiveDate) -> Option<NaiveDate>,
) -> NavigationState {
    match state.cursor().and_then(target) {
        Some(date) => focus(state, date),
        None => state,
    }
}

fn focus(state: NavigationState, date: NaiveDate) -> NavigationState {
    NavigationState {
        focused: Some(date),
        ..state.show(date)
    }
}

/// Column of `date` in a week starting on `first_day` (0..=6).
fn offset_in_week(date: NaiveDate, first_day: Weekday) -> i64 {
    i64::from((date.weekday().num_days_from_sunday() + 7 - first_day.num_days_from_sunday()) % 7)
}
