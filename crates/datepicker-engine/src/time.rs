//! Time-of-day overlay applied to every date entering the committed value.
//!
//! The time sub-control works in 12-hour terms (display hour + AM/PM), while
//! stamping needs a 24-hour clock; [`TimeOfDay`] stores the former and converts.

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDay {
    /// 1..=12
    pub hour12: u32,
    pub pm: bool,
    pub minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour12: 12,
        pm: false,
        minute: 0,
    };

    /// Build from display-hour, minute and meridiem; out-of-range parts are clamped.
    pub fn new(hour12: u32, minute: u32, pm: bool) -> Self {
        Self {
            hour12: hour12.clamp(1, 12),
            pm,
            minute: minute.min(59),
        }
    }

    pub fn from_24h(hour: u32, minute: u32) -> Self {
        let hour = hour % 24;
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        Self {
            hour12,
            pm: hour >= 12,
            minute: minute.min(59),
        }
    }

    pub fn of(date: &CalendarDate) -> Self {
        Self::from_24h(date.hour(), date.minute())
    }

    /// Hour on a 24-hour clock (0..=23).
    pub fn hour24(&self) -> u32 {
        match (self.hour12 % 12, self.pm) {
            (h, false) => h,
            (h, true) => h + 12,
        }
    }

    pub fn to_24h(&self) -> (u32, u32) {
        (self.hour24(), self.minute)
    }

    /// Round the minute down to a multiple of `interval` (1..=60).
    pub fn snap_minute(self, interval: u32) -> Self {
        if interval <= 1 {
            return self;
        }
        Self {
            minute: self.minute - self.minute % interval,
            ..self
        }
    }

    /// Put this time of day on `date`'s calendar day.
    pub fn stamp(&self, date: CalendarDate) -> CalendarDate {
        let (hour, minute) = self.to_24h();
        date.with_time(hour, minute)
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_hour_edges_convert() {
        assert_eq!(TimeOfDay::new(12, 0, false).hour24(), 0);
        assert_eq!(TimeOfDay::new(12, 0, true).hour24(), 12);
        assert_eq!(TimeOfDay::new(1, 0, true).hour24(), 13);
        assert_eq!(TimeOfDay::from_24h(0, 5), TimeOfDay::new(12, 5, false));
        assert_eq!(TimeOfDay::from_24h(23, 59), TimeOfDay::new(11, 59, true));
    }

    #[test]
    fn snap_rounds_down() {
        assert_eq!(TimeOfDay::new(9, 44, false).snap_minute(15).minute, 30);
        assert_eq!(TimeOfDay::new(9, 44, false).snap_minute(1).minute, 44);
    }
}
