//! Serializable picker configuration.
//!
//! Everything a host can express as data lives here and deserializes from
//! camelCase JSON. Behaviour that needs code (holiday providers, custom
//! predicates, key hooks) is attached to the picker at runtime instead.

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constraints::{ConstraintConfig, DateRange};
use crate::error::{DatepickerError, Result};
use crate::locale::DEFAULT_LOCALE;
use crate::recurring::RecurringPattern;
use crate::value::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatepickerOptions {
    pub mode: Mode,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub disabled_dates: Vec<NaiveDate>,
    pub disabled_ranges: Vec<DateRange>,
    /// Make days reported by the holiday provider unselectable.
    pub disable_holidays: bool,
    pub locale: String,
    /// Overrides the locale's first day of week.
    pub first_day_of_week: Option<Weekday>,
    /// Granularity of the minute selector (must divide 60).
    pub minute_interval: u32,
    /// Multiple mode only: clicks replace the selection with this pattern.
    pub recurring_pattern: Option<RecurringPattern>,
    pub show_time: bool,
    pub time_only: bool,
    #[serde(rename = "use24Hour")]
    pub use_24_hour: bool,
    /// strftime pattern for the display string; `%B %b %A %a` use locale names.
    pub display_format: Option<String>,
    /// IANA zone the display string is rendered in.
    pub timezone: Option<String>,
    /// Named date adapter for parsing/formatting (see [`crate::adapter`]).
    pub adapter: Option<String>,
}

impl Default for DatepickerOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            min_date: None,
            max_date: None,
            disabled_dates: Vec::new(),
            disabled_ranges: Vec::new(),
            disable_holidays: false,
            locale: DEFAULT_LOCALE.to_string(),
            first_day_of_week: None,
            minute_interval: 1,
            recurring_pattern: None,
            show_time: false,
            time_only: false,
            use_24_hour: false,
            display_format: None,
            timezone: None,
            adapter: None,
        }
    }
}

impl DatepickerOptions {
    /// Parse options from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: DatepickerOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    /// Reject option combinations the picker cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.minute_interval == 0 || self.minute_interval > 60 || 60 % self.minute_interval != 0
        {
            return Err(DatepickerError::InvalidConfig(format!(
                "minuteInterval must divide 60, got {}",
                self.minute_interval
            )));
        }
        if let (Some(min), Some(max)) = (self.min_date, self.max_date) {
            if min > max {
                return Err(DatepickerError::InvalidConfig(format!(
                    "minDate {} is after maxDate {}",
                    min, max
                )));
            }
        }
        self.timezone()?;
        Ok(())
    }

    /// The parsed display timezone, if one is configured.
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|_| DatepickerError::InvalidTimezone(name.to_string()))
            })
            .transpose()
    }

    /// Whether dates are stamped with the tracked time of day.
    pub fn stamps_time(&self) -> bool {
        self.show_time || self.time_only
    }

    /// The data-expressible part of the constraint configuration.
    pub fn constraint_config(&self) -> ConstraintConfig {
        ConstraintConfig {
            min_date: self.min_date,
            max_date: self.max_date,
            disabled_dates: self.disabled_dates.iter().copied().collect(),
            disabled_ranges: self
                .disabled_ranges
                .iter()
                .map(|r| DateRange::new(r.start, r.end))
                .collect(),
            disable_holidays: self.disable_holidays,
            ..ConstraintConfig::default()
        }
    }

    /// The default strftime pattern for the display string.
    pub fn effective_display_format(&self) -> String {
        if let Some(fmt) = &self.display_format {
            return fmt.clone();
        }
        let time = if self.use_24_hour { "%H:%M" } else { "%I:%M %p" };
        if self.time_only {
            time.to_string()
        } else if self.show_time {
            format!("%Y-%m-%d {}", time)
        } else {
            "%Y-%m-%d".to_string()
        }
    }
}
