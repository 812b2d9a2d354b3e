//! WASM bindings for datepicker-engine.
//!
//! Exposes month grids, selectability checks, recurrence generation,
//! formatting, import/export and a stateful `Datepicker` class to JavaScript
//! via `wasm-bindgen`. Complex values cross the boundary as JSON strings using
//! the engine's own serde shapes (camelCase options, `kind`-tagged values,
//! `type`-tagged intents and actions).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p datepicker-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/datepicker_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, Weekday};
use datepicker_engine::export;
use datepicker_engine::format::format_value;
use datepicker_engine::locale::{resolve_locale, translate as translate_key};
use datepicker_engine::{
    build_month, generate, is_selectable, CalendarDate, Datepicker, DatepickerEvent,
    DatepickerOptions, DatepickerValue, DayCell, Key, KeyPress, NavIntent, RecurringPattern,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON and date conversion at the boundary
// ---------------------------------------------------------------------------

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

/// Parse a calendar day from any string the engine normalizes.
fn parse_day(s: &str) -> Result<NaiveDate, String> {
    datepicker_engine::date::parse(s)
        .map(|d| d.date())
        .ok_or_else(|| format!("Invalid date '{}'", s))
}

/// Column index counted from Sunday (0) to Saturday (6), as `Date.getDay()` does.
fn weekday_from_sunday(n: u8) -> Result<Weekday, String> {
    if n > 6 {
        return Err(format!("Invalid first day of week {} (expected 0-6)", n));
    }
    Ok((0..n).fold(Weekday::Sun, |day, _| day.succ()))
}

fn parse_value(json: &str) -> Result<DatepickerValue, String> {
    export::from_json(json).map_err(|e| e.to_string())
}

fn month_json(year: i32, month: u32, first_day: u8) -> Result<String, String> {
    let cells: Vec<Option<String>> = build_month(year, month, weekday_from_sunday(first_day)?)
        .into_iter()
        .map(|cell| cell.map(|d| d.format("%Y-%m-%d").to_string()))
        .collect();
    to_json(&cells)
}

fn selectable(date: &str, options_json: &str) -> Result<bool, String> {
    let options = DatepickerOptions::from_json(options_json).map_err(|e| e.to_string())?;
    Ok(is_selectable(parse_day(date)?, &options.constraint_config()))
}

fn recurring_json(pattern_json: &str) -> Result<String, String> {
    let pattern: RecurringPattern = serde_json::from_str(pattern_json)
        .map_err(|e| format!("Invalid recurring pattern JSON: {}", e))?;
    to_json(&generate(&pattern))
}

fn export_text(value_json: &str, format: &str) -> Result<String, String> {
    let value = parse_value(value_json)?;
    match format {
        "json" => export::to_json(&value).map_err(|e| e.to_string()),
        "csv" => Ok(export::to_csv(&value)),
        "ics" | "ical" => Ok(export::to_ics(&value)),
        other => Err(format!("Unknown export format '{}'", other)),
    }
}

fn import_text(text: &str, format: &str) -> Result<String, String> {
    let value = match format {
        "json" => export::from_json(text),
        "csv" => export::from_csv(text),
        "ics" | "ical" => export::from_ics(text),
        other => return Err(format!("Unknown import format '{}'", other)),
    }
    .map_err(|e| e.to_string())?;
    to_json(&value)
}

// ---------------------------------------------------------------------------
// Stateless exports
// ---------------------------------------------------------------------------

/// Build the flat month grid.
///
/// Returns a JSON array where `null` is a leading blank and every other entry
/// is a `YYYY-MM-DD` string.
///
/// # Arguments
/// - `year`, `month` -- the month to lay out (`month` is 1-12)
/// - `first_day` -- first column, 0 = Sunday through 6 = Saturday
#[wasm_bindgen(js_name = "buildMonth")]
pub fn build_month_js(year: i32, month: u32, first_day: u8) -> Result<String, JsValue> {
    month_json(year, month, first_day).map_err(js_err)
}

/// Whether `date` is selectable under the constraint fields of `options_json`
/// (`minDate`, `maxDate`, `disabledDates`, `disabledRanges`).
#[wasm_bindgen(js_name = "isSelectable")]
pub fn is_selectable_js(date: &str, options_json: &str) -> Result<bool, JsValue> {
    selectable(date, options_json).map_err(js_err)
}

/// Expand a recurring pattern (camelCase JSON, e.g.
/// `{"pattern":"weekly","startDate":"2024-06-03","occurrences":4}`) into a
/// JSON array of ISO datetimes.
#[wasm_bindgen(js_name = "generateRecurring")]
pub fn generate_recurring(pattern_json: &str) -> Result<String, JsValue> {
    recurring_json(pattern_json).map_err(js_err)
}

/// Render a value for display with a strftime pattern, locale names and an
/// optional IANA timezone.
#[wasm_bindgen(js_name = "formatValue")]
pub fn format_value_js(
    value_json: &str,
    pattern: &str,
    locale: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let value = parse_value(value_json).map_err(js_err)?;
    let tz = DatepickerOptions {
        timezone,
        ..DatepickerOptions::default()
    }
    .timezone()
    .map_err(|e| js_err(e.to_string()))?;
    Ok(format_value(&value, pattern, &resolve_locale(locale), tz))
}

/// Export a value as `json`, `csv` or `ics`.
#[wasm_bindgen(js_name = "exportValue")]
pub fn export_value(value_json: &str, format: &str) -> Result<String, JsValue> {
    export_text(value_json, format).map_err(js_err)
}

/// Import a value from `json`, `csv` or `ics` text; returns the value as JSON.
#[wasm_bindgen(js_name = "importValue")]
pub fn import_value(text: &str, format: &str) -> Result<String, JsValue> {
    import_text(text, format).map_err(js_err)
}

/// Fully-resolved locale metadata (names, first day, RTL, calendar system).
#[wasm_bindgen(js_name = "resolveLocale")]
pub fn resolve_locale_js(locale: &str) -> Result<String, JsValue> {
    to_json(&resolve_locale(locale)).map_err(js_err)
}

/// Translate a UI string key, falling back through the locale chain.
#[wasm_bindgen(js_name = "translate")]
pub fn translate_js(locale: &str, key: &str) -> String {
    translate_key(locale, key)
}

// ---------------------------------------------------------------------------
// Stateful picker
// ---------------------------------------------------------------------------

/// One picker instance. Every mutating call queues events; drain them with
/// `takeEvents()` after each interaction.
#[wasm_bindgen(js_name = "Datepicker")]
pub struct WasmDatepicker {
    inner: Datepicker,
}

#[wasm_bindgen(js_class = "Datepicker")]
impl WasmDatepicker {
    /// Create a picker from camelCase options JSON (`"{}"` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<WasmDatepicker, JsValue> {
        let options =
            DatepickerOptions::from_json(options_json).map_err(|e| js_err(e.to_string()))?;
        let inner = Datepicker::new(options).map_err(|e| js_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Pin "today" (useful for tests and server-rendered pages).
    #[wasm_bindgen(js_name = "setToday")]
    pub fn set_today(&mut self, date: &str) -> Result<(), JsValue> {
        let today = parse_day(date).map_err(js_err)?;
        self.inner.set_today(today);
        Ok(())
    }

    /// Click a day; `null`/unparseable input is ignored like a blank cell.
    pub fn click(&mut self, date: Option<String>) {
        let day = date.as_deref().and_then(|s| parse_day(s).ok());
        self.inner.click(day);
    }

    pub fn hover(&mut self, date: Option<String>) {
        let day = date.as_deref().and_then(|s| parse_day(s).ok());
        self.inner.hover(day);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(js_name = "setTime")]
    pub fn set_time(&mut self, hour12: u32, minute: u32, pm: bool) {
        self.inner.set_time(hour12, minute, pm);
    }

    #[wasm_bindgen(js_name = "setDisabled")]
    pub fn set_disabled(&mut self, disabled: bool) {
        self.inner.set_disabled(disabled);
    }

    /// Feed a DOM `KeyboardEvent.key`. Returns whether the picker handled it
    /// (call `preventDefault()` when true).
    #[wasm_bindgen(js_name = "handleKey")]
    pub fn handle_key(&mut self, key: &str, shift: bool) -> bool {
        match Key::from_dom(key) {
            Some(key) => self.inner.handle_key(KeyPress { key, shift }),
            None => false,
        }
    }

    /// Apply a navigation intent, e.g. `{"type":"monthDelta","months":1}`.
    pub fn navigate(&mut self, intent_json: &str) -> Result<(), JsValue> {
        let intent: NavIntent = serde_json::from_str(intent_json)
            .map_err(|e| js_err(format!("Invalid navigation intent JSON: {}", e)))?;
        self.inner.navigate(intent);
        Ok(())
    }

    /// Apply one of the default range presets by label (e.g. "Last 7 days").
    #[wasm_bindgen(js_name = "selectPreset")]
    pub fn select_preset(&mut self, label: &str) -> bool {
        let preset = self
            .inner
            .default_presets()
            .into_iter()
            .find(|p| p.label == label);
        match preset {
            Some(preset) => {
                self.inner.select_preset(&preset);
                true
            }
            None => false,
        }
    }

    /// Programmatic write (form binding); queues no `valueChanged`.
    #[wasm_bindgen(js_name = "writeValue")]
    pub fn write_value(&mut self, value_json: &str) -> Result<(), JsValue> {
        let value = parse_value(value_json).map_err(js_err)?;
        self.inner.write_value(value);
        Ok(())
    }

    pub fn value(&self) -> Result<String, JsValue> {
        to_json(&self.inner.value()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "displayValue")]
    pub fn display_value(&self) -> String {
        self.inner.display_value()
    }

    /// The visible grid: `null` for blanks, otherwise a cell object with flags.
    pub fn cells(&self) -> Result<String, JsValue> {
        let cells: Vec<Option<DayCell>> = self.inner.cells();
        to_json(&cells).map_err(js_err)
    }

    pub fn navigation(&self) -> Result<String, JsValue> {
        to_json(self.inner.navigation()).map_err(js_err)
    }

    pub fn presets(&self) -> Result<String, JsValue> {
        to_json(&self.inner.default_presets()).map_err(js_err)
    }

    /// Drain queued events as a JSON array of `{event, payload}` objects.
    #[wasm_bindgen(js_name = "takeEvents")]
    pub fn take_events(&mut self) -> Result<String, JsValue> {
        let events: Vec<DatepickerEvent> = self.inner.take_events();
        to_json(&events).map_err(js_err)
    }

    /// Parse typed text the way the configured adapter reads it.
    #[wasm_bindgen(js_name = "parseInput")]
    pub fn parse_input(&self, text: &str) -> Option<String> {
        self.inner
            .parse_input(text)
            .map(|d: CalendarDate| d.to_string())
    }
}
