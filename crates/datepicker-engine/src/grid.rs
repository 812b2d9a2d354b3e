//! Calendar grid generation.
//!
//! The month grid is a flat, ordered sequence: leading blanks up to the first
//! day of the month, then one cell per day. Renderers group it into rows of
//! seven with [`weeks`].

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date::{days_in_month, offset_days};

/// Number of blank cells before the 1st so that columns start on `first_day`.
pub fn leading_blanks(year: i32, month: u32, first_day: Weekday) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let dow = first.weekday().num_days_from_sunday();
    (dow + 7 - first_day.num_days_from_sunday()) % 7
}

/// Build the day cells for `month` of `year`.
///
/// `None` entries are the leading blanks; the result always has
/// `leading_blanks + days_in_month` entries. An invalid month yields an
/// empty grid.
pub fn build_month(year: i32, month: u32, first_day: Weekday) -> Vec<Option<NaiveDate>> {
    if !(1..=12).contains(&month) {
        return Vec::new();
    }
    let blanks = leading_blanks(year, month, first_day) as usize;
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity(blanks + days as usize);
    cells.resize(blanks, None);
    cells.extend((1..=days).map(|d| NaiveDate::from_ymd_opt(year, month, d)));
    cells
}

/// Weekday column order for a header row starting on `first_day`.
pub fn weekday_order(first_day: Weekday) -> [Weekday; 7] {
    let mut order = [first_day; 7];
    let mut day = first_day;
    for slot in order.iter_mut() {
        *slot = day;
        day = day.succ();
    }
    order
}

/// Group a flat grid into rows of seven. The last row may be short.
pub fn weeks<T>(cells: &[T]) -> impl Iterator<Item = &[T]> {
    cells.chunks(7)
}

/// One cell of the year view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCell {
    pub year: i32,
    pub month: u32,
}

/// The twelve months of `year`.
pub fn build_year(year: i32) -> Vec<MonthCell> {
    (1..=12).map(|month| MonthCell { year, month }).collect()
}

/// The ten years of the decade containing `year` (e.g. 2020..=2029).
pub fn build_decade(year: i32) -> Vec<i32> {
    let start = year - year.rem_euclid(10);
    (start..start + 10).collect()
}

/// A contiguous strip of `2 * radius + 1` days centred on `center`, cut
/// short where it would leave chrono's date range.
pub fn build_timeline(center: NaiveDate, radius: u32) -> Vec<NaiveDate> {
    let radius = i64::from(radius);
    let first = offset_days(center, -radius).unwrap_or(NaiveDate::MIN);
    let last = offset_days(center, radius).unwrap_or(NaiveDate::MAX);
    first.iter_days().take_while(|day| *day <= last).collect()
}

/// A renderable day cell with everything a view needs to style it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub selectable: bool,
    pub selected: bool,
    pub range_start: bool,
    pub range_end: bool,
    /// Strictly between a committed range's start and end.
    pub in_range: bool,
    /// Inside the hover preview of an unfinished range.
    pub in_preview: bool,
    pub holiday: bool,
    pub holiday_label: Option<String>,
    pub today: bool,
    pub focused: bool,
}

impl DayCell {
    /// A cell with every flag cleared.
    pub fn plain(date: NaiveDate) -> Self {
        Self {
            date,
            selectable: true,
            selected: false,
            range_start: false,
            range_end: false,
            in_range: false,
            in_preview: false,
            holiday: false,
            holiday_label: None,
            today: false,
            focused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_order_wraps_around_the_week() {
        assert_eq!(
            weekday_order(Weekday::Sat),
            [
                Weekday::Sat,
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ]
        );
    }
}
