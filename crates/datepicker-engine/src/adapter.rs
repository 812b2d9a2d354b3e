//! Pluggable date-library adapters.
//!
//! Hosts that already use a date library can route parsing and formatting
//! through it by registering a [`DateAdapter`]. Asking for an adapter that was
//! never registered is an integration bug, so [`DateAdapters::get`] fails loudly
//! with [`DatepickerError::AdapterMissing`] rather than silently falling back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::date::CalendarDate;
use crate::error::{DatepickerError, Result};
use crate::format::render;

/// Parse/format capability provided by a date library.
pub trait DateAdapter: Send + Sync {
    /// Registry key, e.g. `"chrono"`.
    fn name(&self) -> &str;

    /// Parse `input` using `format`; `None` when it does not match.
    fn parse(&self, input: &str, format: &str) -> Option<CalendarDate>;

    fn format(&self, date: &CalendarDate, format: &str) -> String;
}

/// Built-in adapter backed by chrono's strftime syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChronoAdapter;

impl DateAdapter for ChronoAdapter {
    fn name(&self) -> &str {
        "chrono"
    }

    fn parse(&self, input: &str, format: &str) -> Option<CalendarDate> {
        let input = input.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(CalendarDate::from_naive(dt));
        }
        // Date-only formats carry no time fields for NaiveDateTime to consume.
        NaiveDate::parse_from_str(input, format)
            .ok()
            .map(CalendarDate::from_date)
    }

    fn format(&self, date: &CalendarDate, format: &str) -> String {
        render(date.naive().format(format)).unwrap_or_else(|| date.to_string())
    }
}

/// Adapters indexed by name.
pub struct DateAdapters {
    adapters: HashMap<String, Arc<dyn DateAdapter>>,
}

impl DateAdapters {
    /// A registry holding only the built-in [`ChronoAdapter`].
    pub fn new() -> Self {
        let mut adapters: HashMap<String, Arc<dyn DateAdapter>> = HashMap::new();
        adapters.insert("chrono".to_string(), Arc::new(ChronoAdapter));
        Self { adapters }
    }

    /// Register (or replace) an adapter under its own name.
    pub fn register(&mut self, adapter: Arc<dyn DateAdapter>) {
        debug!(adapter = adapter.name(), "registering date adapter");
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Look up an adapter by name.
    ///
    /// # Errors
    /// Returns `DatepickerError::AdapterMissing` if no adapter has that name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn DateAdapter>> {
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| DatepickerError::AdapterMissing(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DateAdapters {
    fn default() -> Self {
        Self::new()
    }
}
