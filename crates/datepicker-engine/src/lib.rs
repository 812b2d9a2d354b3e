//! # datepicker-engine
//!
//! The date-selection and calendar-generation state machine behind a
//! date-picker widget, independent of any UI framework.
//!
//! A host layer feeds configuration and user intents (clicks, keys, swipes,
//! time changes) into a [`Datepicker`], reads back the visible month grid and
//! the committed [`DatepickerValue`], and drains queued notifications. Drawing
//! is entirely the host's business.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use datepicker_engine::{Datepicker, DatepickerOptions, DatepickerValue, Mode};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
//! let options = DatepickerOptions::default().with_mode(Mode::Range);
//! let mut picker = Datepicker::new(options).unwrap().with_today(day(1));
//!
//! picker.click(Some(day(10)));
//! picker.click(Some(day(20)));
//! assert!(matches!(picker.value(), DatepickerValue::Range { end: Some(_), .. }));
//! ```
//!
//! ## Modules
//!
//! - [`date`] -- heterogeneous input → [`CalendarDate`] normalization
//! - [`grid`] -- month/year/decade/timeline cell generation
//! - [`constraints`] -- selectability rules with a memoizing evaluator
//! - [`selection`] -- per-mode selection state machine, events, range presets
//! - [`picker`] -- the [`Datepicker`] tying everything together
//! - [`recurring`] -- daily/weekly/monthly/yearly/weekday/weekend generation
//! - [`locale`] -- locale metadata and translation registries with fallback
//! - [`navigation`] / [`keyboard`] -- view navigation and key mapping
//! - [`time`] -- 12/24-hour time-of-day overlay
//! - [`format`] -- locale- and timezone-aware display strings
//! - [`export`] -- JSON/CSV/iCalendar import and export
//! - [`adapter`] -- pluggable date-library adapters
//! - [`options`] -- serializable configuration
//! - [`error`] -- Error types

pub mod adapter;
pub mod constraints;
pub mod date;
pub mod error;
pub mod export;
pub mod format;
pub mod grid;
pub mod keyboard;
pub mod locale;
pub mod navigation;
pub mod options;
pub mod picker;
pub mod recurring;
pub mod selection;
pub mod time;
pub mod value;

pub use adapter::{ChronoAdapter, DateAdapter, DateAdapters};
pub use constraints::{
    is_selectable, ConstraintConfig, ConstraintEvaluator, DateRange, HolidayProvider,
};
pub use date::{normalize, CalendarDate, DateInput, DateLike};
pub use error::DatepickerError;
pub use grid::{build_month, DayCell};
pub use keyboard::{Key, KeyBindings, KeyCommand, KeyPress};
pub use locale::{LocaleData, LocaleRegistry, ResolvedLocale, TranslationRegistry, Translations};
pub use navigation::{NavIntent, NavigationState, SwipeDirection, ViewMode};
pub use options::DatepickerOptions;
pub use picker::Datepicker;
pub use recurring::{generate, RecurrenceKind, RecurringPattern};
pub use selection::{DatepickerAction, DatepickerEvent, RangePreset, SelectionState};
pub use time::TimeOfDay;
pub use value::{DatepickerValue, Mode, ValueSource};
