//! Selectability rules: min/max bounds, disabled dates and ranges, holidays,
//! and caller-supplied predicates.
//!
//! [`is_selectable`] is the pure rule. [`ConstraintEvaluator`] wraps it with a
//! per-day memo so a month render (at most 42 lookups) does not re-run
//! predicates that have not changed. The memo is versioned by configuration and
//! must be invalidated explicitly whenever the configuration or the visible
//! month changes.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive inverted.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// External knowledge about public holidays.
pub trait HolidayProvider: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;

    fn holiday_label(&self, _date: NaiveDate) -> Option<String> {
        None
    }
}

/// A fixed table of holidays.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    days: HashMap<NaiveDate, String>,
}

impl StaticHolidays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, date: NaiveDate, label: impl Into<String>) -> Self {
        self.days.insert(date, label.into());
        self
    }
}

impl FromIterator<(NaiveDate, String)> for StaticHolidays {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl HolidayProvider for StaticHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    fn holiday_label(&self, date: NaiveDate) -> Option<String> {
        self.days.get(&date).cloned()
    }
}

pub type DatePredicate = Arc<dyn Fn(NaiveDate) -> bool + Send + Sync>;

/// Everything that can disqualify a date. Replaced wholesale on update.
#[derive(Clone, Default)]
pub struct ConstraintConfig {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub disabled_dates: BTreeSet<NaiveDate>,
    pub disabled_ranges: Vec<DateRange>,
    pub holiday_provider: Option<Arc<dyn HolidayProvider>>,
    pub disable_holidays: bool,
    /// Returns `true` for dates that must NOT be selectable.
    pub custom_predicate: Option<DatePredicate>,
}

impl ConstraintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    pub fn disable_date(mut self, date: NaiveDate) -> Self {
        self.disabled_dates.insert(date);
        self
    }

    pub fn disable_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.disabled_ranges.push(DateRange::new(start, end));
        self
    }

    pub fn holidays(mut self, provider: Arc<dyn HolidayProvider>, disable: bool) -> Self {
        self.holiday_provider = Some(provider);
        self.disable_holidays = disable;
        self
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(NaiveDate) -> bool + Send + Sync + 'static,
    {
        self.custom_predicate = Some(Arc::new(f));
        self
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_provider
            .as_ref()
            .is_some_and(|p| p.is_holiday(date))
    }

    pub fn holiday_label(&self, date: NaiveDate) -> Option<String> {
        let provider = self.holiday_provider.as_ref()?;
        if provider.is_holiday(date) {
            provider.holiday_label(date)
        } else {
            None
        }
    }
}

impl fmt::Debug for ConstraintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintConfig")
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .field("disabled_dates", &self.disabled_dates)
            .field("disabled_ranges", &self.disabled_ranges)
            .field("holiday_provider", &self.holiday_provider.is_some())
            .field("disable_holidays", &self.disable_holidays)
            .field("custom_predicate", &self.custom_predicate.is_some())
            .finish()
    }
}

/// Decide whether `date` may be selected under `config`.
///
/// Checks run in a fixed order and the first disqualifying rule wins:
/// disabled holiday, before `min_date`, after `max_date`, inside a disabled
/// range, an explicitly disabled date, then the custom predicate. All
/// comparisons are by calendar day, so `max_date` admits its whole day.
pub fn is_selectable(date: NaiveDate, config: &ConstraintConfig) -> bool {
    if config.disable_holidays && config.is_holiday(date) {
        return false;
    }
    if config.min_date.is_some_and(|min| date < min) {
        return false;
    }
    if config.max_date.is_some_and(|max| date > max) {
        return false;
    }
    if config.disabled_ranges.iter().any(|r| r.contains(date)) {
        return false;
    }
    if config.disabled_dates.contains(&date) {
        return false;
    }
    if let Some(pred) = &config.custom_predicate {
        if pred(date) {
            return false;
        }
    }
    true
}

/// Memoizing front end for [`is_selectable`].
pub struct ConstraintEvaluator {
    config: ConstraintConfig,
    version: u64,
    memo: RefCell<HashMap<NaiveDate, bool>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl ConstraintEvaluator {
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            version: 0,
            memo: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn config(&self) -> &ConstraintConfig {
        &self.config
    }

    /// Monotonic counter bumped on every configuration replacement.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Swap in a new configuration and drop every memoized answer.
    pub fn replace_config(&mut self, config: ConstraintConfig) {
        self.config = config;
        self.version += 1;
        self.invalidate();
    }

    /// Drop memoized answers without changing the configuration.
    pub fn invalidate(&self) {
        self.memo.borrow_mut().clear();
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        if let Some(&cached) = self.memo.borrow().get(&date) {
            self.hits.set(self.hits.get() + 1);
            return cached;
        }
        self.misses.set(self.misses.get() + 1);
        let answer = is_selectable(date, &self.config);
        self.memo.borrow_mut().insert(date, answer);
        answer
    }

    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    pub fn misses(&self) -> u64 {
        self.misses.get()
    }
}

impl Default for ConstraintEvaluator {
    fn default() -> Self {
        Self::new(ConstraintConfig::default())
    }
}

impl fmt::Debug for ConstraintEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintEvaluator")
            .field("config", &self.config)
            .field("version", &self.version)
            .field("memoized", &self.memo.borrow().len())
            .finish()
    }
}
