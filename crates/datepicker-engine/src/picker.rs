//! The date-picker engine: owns selection, navigation, constraints and time of
//! day for one widget instance, and queues notifications for the host.
//!
//! Every intent is synchronous and atomic: it either fully applies or does
//! nothing. Committed changes queue exactly one [`DatepickerEvent::ValueChanged`]
//! followed by the matching [`DatepickerEvent::Action`]. Programmatic writes
//! ([`Datepicker::write_value`]) never queue `ValueChanged`, so hosts that
//! mirror the value into a form binding do not loop.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::adapter::{DateAdapter, DateAdapters};
use crate::constraints::{ConstraintConfig, ConstraintEvaluator, DateRange};
use crate::date::{normalize, offset_days, CalendarDate, DateInput};
use crate::error::Result;
use crate::format::{format_date, join_value};
use crate::grid::{self, DayCell};
use crate::keyboard::{self, KeyBindings, KeyCommand, KeyPress, KeyResolution};
use crate::locale::{resolve_locale, ResolvedLocale};
use crate::navigation::{self, NavContext, NavIntent, NavigationState, SwipeDirection, ViewMode};
use crate::options::DatepickerOptions;
use crate::recurring;
use crate::selection::{
    DatepickerAction, DatepickerEvent, RangePreset, SelectionState, Transition,
};
use crate::time::TimeOfDay;
use crate::value::{DatepickerValue, Mode, ValueSource};

pub struct Datepicker {
    options: DatepickerOptions,
    evaluator: ConstraintEvaluator,
    selection: SelectionState,
    nav: NavigationState,
    time: TimeOfDay,
    locale: ResolvedLocale,
    timezone: Option<Tz>,
    adapter: Option<Arc<dyn DateAdapter>>,
    bindings: KeyBindings,
    today: NaiveDate,
    disabled: bool,
    open: bool,
    grid: Vec<Option<NaiveDate>>,
    events: Vec<DatepickerEvent>,
}

impl Datepicker {
    /// Build a picker with the built-in date adapters.
    ///
    /// # Errors
    /// Fails if the options are invalid or name an unregistered adapter.
    pub fn new(options: DatepickerOptions) -> Result<Self> {
        Self::with_adapters(options, &DateAdapters::new())
    }

    /// Build a picker resolving `options.adapter` against `adapters`.
    pub fn with_adapters(options: DatepickerOptions, adapters: &DateAdapters) -> Result<Self> {
        options.validate()?;
        let adapter = options
            .adapter
            .as_deref()
            .map(|name| adapters.get(name))
            .transpose()?;
        let timezone = options.timezone()?;
        let locale = resolve_locale(&options.locale);
        let today = Local::now().date_naive();

        let mut picker = Self {
            evaluator: ConstraintEvaluator::new(options.constraint_config()),
            selection: SelectionState::empty(options.mode),
            nav: NavigationState::at(today),
            time: TimeOfDay::default(),
            locale,
            timezone,
            adapter,
            bindings: KeyBindings::default(),
            today,
            disabled: false,
            open: true,
            grid: Vec::new(),
            events: Vec::new(),
            options,
        };
        picker.rebuild_grid(false);
        Ok(picker)
    }

    /// Pin "today" (and the initial view) to a fixed day.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.set_today(today);
        self
    }

    /// Move "today" and show its month. The selection is kept.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.nav = NavigationState::at(today);
        self.rebuild_grid(false);
    }

    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Replace the constraint configuration wholesale.
    pub fn set_constraints(&mut self, config: ConstraintConfig) {
        self.evaluator.replace_config(config);
    }

    /// Replace the options. Runtime capabilities (holiday provider, predicate)
    /// attached with [`Datepicker::set_constraints`] are kept. A mode change
    /// clears the selection.
    pub fn set_options(&mut self, options: DatepickerOptions) -> Result<()> {
        options.validate()?;
        let timezone = options.timezone()?;
        let current = self.evaluator.config();
        let config = ConstraintConfig {
            holiday_provider: current.holiday_provider.clone(),
            custom_predicate: current.custom_predicate.clone(),
            ..options.constraint_config()
        };
        let mode_changed = options.mode != self.options.mode;
        self.locale = resolve_locale(&options.locale);
        self.timezone = timezone;
        self.options = options;
        self.evaluator.replace_config(config);
        if mode_changed {
            self.selection = SelectionState::empty(self.options.mode);
        }
        self.rebuild_grid(false);
        Ok(())
    }

    pub fn options(&self) -> &DatepickerOptions {
        &self.options
    }

    pub fn constraints(&self) -> &ConstraintConfig {
        self.evaluator.config()
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// Switch selection mode, discarding the current selection silently.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.options.mode {
            return;
        }
        debug!(?mode, "selection mode changed");
        self.options.mode = mode;
        self.selection = SelectionState::empty(mode);
    }

    pub fn value(&self) -> DatepickerValue {
        self.selection.value()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn locale(&self) -> &ResolvedLocale {
        &self.locale
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.options
            .first_day_of_week
            .unwrap_or(self.locale.first_day_of_week)
    }

    /// Drain queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<DatepickerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_selectable(&self, day: NaiveDate) -> bool {
        self.evaluator.is_selectable(day)
    }

    /// Click on a day cell. Disabled days, missing dates and a disabled picker
    /// are ignored.
    pub fn click(&mut self, day: Option<NaiveDate>) {
        let Some(day) = day else {
            return;
        };
        if self.disabled || !self.evaluator.is_selectable(day) {
            debug!(%day, "ignoring click on unselectable date");
            return;
        }
        self.nav.focused = Some(day);

        if self.options.mode == Mode::Multiple {
            if let Some(pattern) = self.options.recurring_pattern.clone() {
                self.apply_recurrence(day, &pattern);
                return;
            }
        }

        let date = self.stamp(CalendarDate::from_date(day));
        match self.selection.click(date) {
            Transition::Unchanged | Transition::RangeStarted(_) => {}
            Transition::Selected(date) => {
                self.commit(DatepickerAction::DateSelected {
                    date,
                    selected: true,
                });
            }
            Transition::Deselected(date) => {
                self.commit(DatepickerAction::DateSelected {
                    date,
                    selected: false,
                });
            }
            Transition::RangeCompleted { start, end } => {
                self.commit(DatepickerAction::RangeSelected { start, end });
            }
        }
    }

    /// Click with any supported date input.
    pub fn click_input(&mut self, input: DateInput<'_>) {
        self.click(normalize(input).map(|d| d.date()));
    }

    fn apply_recurrence(&mut self, anchor: NaiveDate, pattern: &recurring::RecurringPattern) {
        let dates: Vec<CalendarDate> = recurring::generate(&pattern.starting(anchor))
            .into_iter()
            .filter(|d| self.evaluator.is_selectable(d.date()))
            .map(|d| self.stamp(d))
            .collect();
        self.selection.replace_all(dates);
        let dates = self.selection.value().dates();
        self.commit(DatepickerAction::RecurrenceApplied { anchor, dates });
    }

    /// Pointer over a day (or off the grid with `None`).
    pub fn hover(&mut self, day: Option<NaiveDate>) {
        if self.disabled {
            return;
        }
        self.selection.hover(day);
    }

    /// The uncommitted range preview, if any.
    pub fn preview_range(&self) -> Option<DateRange> {
        self.selection.preview()
    }

    /// Clear the selection. Emits only if something was selected.
    pub fn clear(&mut self) {
        if self.disabled || self.selection.is_empty() {
            return;
        }
        self.selection = SelectionState::empty(self.options.mode);
        self.commit(DatepickerAction::Clear);
    }

    /// Change the time of day from the time sub-control and re-stamp the selection.
    pub fn set_time(&mut self, hour12: u32, minute: u32, pm: bool) {
        self.apply_time(TimeOfDay::new(hour12, minute, pm));
    }

    pub fn set_time_24h(&mut self, hour: u32, minute: u32) {
        self.apply_time(TimeOfDay::from_24h(hour, minute));
    }

    fn apply_time(&mut self, time: TimeOfDay) {
        if self.disabled {
            return;
        }
        self.time = time.snap_minute(self.options.minute_interval);
        let (hour, minute) = self.time.to_24h();

        let mut has_value = self.selection.restamp(self.time);
        if !has_value && self.options.time_only {
            // A time-only picker has no date cells; the time lands on today.
            let today = self.time.stamp(CalendarDate::from_date(self.today));
            has_value = match self.selection {
                SelectionState::Range { .. } => self.selection.set_range(today, today).is_some(),
                _ => matches!(self.selection.click(today), Transition::Selected(_)),
            };
        }
        if has_value {
            self.events.push(DatepickerEvent::ValueChanged(self.value()));
        }
        self.events
            .push(DatepickerEvent::Action(DatepickerAction::TimeChanged { hour, minute }));
    }

    /// Apply a named range preset. Range mode only.
    pub fn select_preset(&mut self, preset: &RangePreset) {
        if self.disabled {
            return;
        }
        let start = self.stamp(CalendarDate::from_date(preset.start));
        let end = self.stamp(CalendarDate::from_date(preset.end));
        if let Some((start, end)) = self.selection.set_range(start, end) {
            self.commit(DatepickerAction::RangeSelected { start, end });
        }
    }

    /// Range presets relative to today.
    pub fn default_presets(&self) -> Vec<RangePreset> {
        RangePreset::defaults(self.today)
    }

    /// Assign the value from outside (form binding, initial value).
    ///
    /// The value is reshaped for the current mode, the view moves to it and
    /// the grid is regenerated. No `ValueChanged` is queued.
    pub fn write_value(&mut self, value: DatepickerValue) {
        self.selection = SelectionState::from_value(value, self.options.mode);
        if let Some(first) = self.selection.value().dates().first() {
            if self.options.stamps_time() {
                self.time = TimeOfDay::of(first);
            }
            self.nav = navigation::handle(
                NavIntent::GoTo {
                    year: first.year(),
                    month: first.month(),
                },
                &self.nav,
                self.nav_context(),
            );
        }
        self.evaluator.invalidate();
        self.rebuild_grid(true);
    }

    /// Write a single host input; unusable input clears the value.
    pub fn write_input(&mut self, input: DateInput<'_>) {
        self.write_value(DatepickerValue::from_input(input));
    }

    /// Pull from a host value binding, writing only when it differs.
    pub fn sync_from(&mut self, source: &dyn ValueSource) {
        let incoming = source.read().coerce(self.options.mode);
        if incoming != self.value() {
            self.write_value(incoming);
        }
    }

    /// Push the current value into a host value binding.
    pub fn publish_to(&self, sink: &mut dyn ValueSource) {
        sink.write(&self.value());
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            self.disabled = disabled;
            self.events.push(DatepickerEvent::DisabledChanged(disabled));
        }
    }

    /// Apply a navigation intent; a month change regenerates the grid.
    pub fn navigate(&mut self, intent: NavIntent) {
        if self.disabled {
            return;
        }
        let next = navigation::handle(intent, &self.nav, self.nav_context());
        let month_changed = !next.same_view(&self.nav);
        self.nav = next;
        if month_changed {
            self.evaluator.invalidate();
            self.events
                .push(DatepickerEvent::Action(DatepickerAction::MonthChanged {
                    year: self.nav.view_year,
                    month: self.nav.view_month,
                }));
            self.rebuild_grid(true);
        }
    }

    pub fn next_month(&mut self) {
        self.navigate(NavIntent::MonthDelta { months: 1 });
    }

    pub fn previous_month(&mut self) {
        self.navigate(NavIntent::MonthDelta { months: -1 });
    }

    pub fn go_to(&mut self, year: i32, month: u32) {
        self.navigate(NavIntent::GoTo { year, month });
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.navigate(NavIntent::SetViewMode { mode });
    }

    pub fn swipe(&mut self, direction: SwipeDirection) {
        self.navigate(NavIntent::Swipe { direction });
    }

    /// Handle a key press. Returns whether anything claimed it.
    pub fn handle_key(&mut self, press: KeyPress) -> bool {
        if self.disabled {
            return false;
        }
        match keyboard::map_key(press, &self.nav, self.locale.rtl, &self.bindings) {
            KeyResolution::HandledByHook => true,
            KeyResolution::Command(command) => {
                self.run_command(command);
                true
            }
            KeyResolution::Unhandled => false,
        }
    }

    fn run_command(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Navigate { intent } => self.navigate(intent),
            KeyCommand::SelectFocused => self.click(self.nav.focused),
            KeyCommand::Close => self.close(),
            KeyCommand::SelectRelative { days } => {
                let Some(day) = offset_days(self.today, days) else {
                    debug!(days, "relative selection outside the calendar");
                    return;
                };
                self.navigate(NavIntent::Focus { date: day });
                self.click(Some(day));
            }
        }
    }

    /// The visible month grid with per-cell flags; `None` entries are blanks.
    pub fn cells(&self) -> Vec<Option<DayCell>> {
        self.grid
            .iter()
            .map(|slot| slot.map(|day| self.cell(day)))
            .collect()
    }

    fn cell(&self, day: NaiveDate) -> DayCell {
        let config = self.evaluator.config();
        let committed = self.selection.committed_range();
        let preview = self.selection.preview();
        let range_start = self.selection.range_start();
        DayCell {
            selectable: self.evaluator.is_selectable(day),
            selected: self.selection.is_selected(day),
            range_start: range_start == Some(day),
            range_end: committed.is_some_and(|r| r.end == day),
            in_range: committed.is_some_and(|r| r.start < day && day < r.end),
            in_preview: preview.is_some_and(|r| r.start < day && day <= r.end),
            holiday: config.is_holiday(day),
            holiday_label: config.holiday_label(day),
            today: day == self.today,
            focused: self.nav.focused == Some(day),
            ..DayCell::plain(day)
        }
    }

    /// The current value rendered for an input field.
    pub fn display_value(&self) -> String {
        let pattern = self.options.effective_display_format();
        let value = self.value();
        match &self.adapter {
            Some(adapter) => join_value(&value, |d| adapter.format(d, &pattern)),
            None => join_value(&value, |d| format_date(d, &pattern, &self.locale, self.timezone)),
        }
    }

    /// Parse typed text (through the adapter when one is configured).
    pub fn parse_input(&self, text: &str) -> Option<CalendarDate> {
        match &self.adapter {
            Some(adapter) => adapter
                .parse(text, &self.options.effective_display_format())
                .or_else(|| normalize(DateInput::Text(text))),
            None => normalize(DateInput::Text(text)),
        }
    }

    fn stamp(&self, date: CalendarDate) -> CalendarDate {
        if self.options.stamps_time() {
            self.time.stamp(date)
        } else {
            date
        }
    }

    fn commit(&mut self, action: DatepickerAction) {
        let value = self.value();
        debug!(?value, "committed selection change");
        self.events.push(DatepickerEvent::ValueChanged(value));
        self.events.push(DatepickerEvent::Action(action));
    }

    fn nav_context(&self) -> NavContext {
        NavContext {
            first_day: self.first_day_of_week(),
            rtl: self.locale.rtl,
        }
    }

    fn rebuild_grid(&mut self, emit: bool) {
        let (year, month) = (self.nav.view_year, self.nav.view_month);
        self.grid = grid::build_month(year, month, self.first_day_of_week());
        debug!(year, month, cells = self.grid.len(), "generated month grid");
        if emit {
            self.events
                .push(DatepickerEvent::Action(DatepickerAction::CalendarGenerated {
                    year,
                    month,
                    cells: self.grid.len(),
                }));
        }
    }
}

impl std::fmt::Debug for Datepicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datepicker")
            .field("options", &self.options)
            .field("selection", &self.selection)
            .field("nav", &self.nav)
            .field("time", &self.time)
            .field("today", &self.today)
            .field("disabled", &self.disabled)
            .finish()
    }
}
