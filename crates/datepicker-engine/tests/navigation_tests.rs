//! Tests for view navigation, keyboard mapping and swipe handling.

use chrono::{NaiveDate, Weekday};
use datepicker_engine::keyboard::{builtin, map_key, KeyResolution};
use datepicker_engine::navigation::{handle, NavContext};
use datepicker_engine::{
    CalendarDate, Datepicker, DatepickerAction, DatepickerEvent, DatepickerOptions,
    DatepickerValue, Key, KeyBindings, KeyCommand, KeyPress, NavIntent, NavigationState,
    SwipeDirection, ViewMode,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn focused_at(d: NaiveDate) -> NavigationState {
    NavigationState {
        focused: Some(d),
        ..NavigationState::at(d)
    }
}

fn ltr() -> NavContext {
    NavContext::default()
}

fn monday_first() -> NavContext {
    NavContext {
        first_day: Weekday::Mon,
        rtl: false,
    }
}

fn picker() -> Datepicker {
    Datepicker::new(DatepickerOptions::default())
        .unwrap()
        .with_today(day(2024, 6, 1))
}

// ---------------------------------------------------------------------------
// Pure transitions
// ---------------------------------------------------------------------------

#[test]
fn month_step_carries_focus_and_clamps() {
    let next = handle(NavIntent::MonthDelta { months: 1 }, &focused_at(day(2024, 1, 31)), ltr());
    assert_eq!((next.view_year, next.view_month), (2024, 2));
    assert_eq!(next.focused, Some(day(2024, 2, 29)));
}

#[test]
fn month_step_wraps_the_year() {
    let state = NavigationState::at(day(2024, 12, 5));
    let next = handle(NavIntent::MonthDelta { months: 1 }, &state, ltr());
    assert_eq!((next.view_year, next.view_month), (2025, 1));
    let back = handle(NavIntent::MonthDelta { months: -13 }, &next, ltr());
    assert_eq!((back.view_year, back.view_month), (2023, 12));
}

#[test]
fn year_step() {
    let next = handle(NavIntent::YearDelta { years: -1 }, &focused_at(day(2024, 2, 29)), ltr());
    assert_eq!((next.view_year, next.view_month), (2023, 2));
    assert_eq!(next.focused, Some(day(2023, 2, 28)));
}

#[test]
fn go_to_ignores_invalid_months() {
    let state = NavigationState::at(day(2024, 6, 1));
    assert_eq!(handle(NavIntent::GoTo { year: 2030, month: 13 }, &state, ltr()), state);
    let moved = handle(NavIntent::GoTo { year: 2030, month: 3 }, &state, ltr());
    assert_eq!((moved.view_year, moved.view_month), (2030, 3));
}

#[test]
fn go_to_ignores_years_outside_the_calendar() {
    let state = NavigationState::at(day(2024, 6, 1));
    assert_eq!(handle(NavIntent::GoTo { year: 300_000, month: 6 }, &state, ltr()), state);
    assert_eq!(handle(NavIntent::GoTo { year: i32::MIN, month: 1 }, &state, ltr()), state);
}

#[test]
fn steps_past_the_calendar_edge_are_ignored() {
    let last = focused_at(NaiveDate::MAX);
    assert_eq!(handle(NavIntent::MonthDelta { months: 1 }, &last, ltr()), last);
    assert_eq!(handle(NavIntent::YearDelta { years: i32::MAX }, &last, ltr()), last);
    let first = focused_at(NaiveDate::MIN);
    assert_eq!(handle(NavIntent::MonthDelta { months: -1 }, &first, ltr()), first);
}

#[test]
fn huge_focus_moves_leave_the_state_alone() {
    let state = focused_at(day(2024, 6, 15));
    for days in [i64::MAX, i64::MIN, 200_000_000, -200_000_000] {
        assert_eq!(handle(NavIntent::MoveFocus { days }, &state, ltr()), state);
    }
    let edge = focused_at(NaiveDate::MAX);
    let week_end = handle(NavIntent::FocusWeekEnd, &edge, monday_first());
    assert_eq!(week_end.focused, Some(NaiveDate::MAX));
}

#[test]
fn focus_moves_bring_their_month_into_view() {
    let next = handle(NavIntent::MoveFocus { days: 1 }, &focused_at(day(2024, 6, 30)), ltr());
    assert_eq!(next.focused, Some(day(2024, 7, 1)));
    assert_eq!(next.view_month, 7);
}

#[test]
fn focus_move_without_focus_starts_at_first_of_view() {
    let state = NavigationState::at(day(2024, 6, 20));
    let next = handle(NavIntent::MoveFocus { days: 7 }, &state, ltr());
    assert_eq!(next.focused, Some(day(2024, 6, 8)));
}

#[test]
fn week_start_and_end_follow_first_day() {
    // Wednesday.
    let state = focused_at(day(2024, 6, 5));
    assert_eq!(handle(NavIntent::FocusWeekStart, &state, ltr()).focused, Some(day(2024, 6, 2)));
    assert_eq!(handle(NavIntent::FocusWeekEnd, &state, ltr()).focused, Some(day(2024, 6, 8)));
    assert_eq!(
        handle(NavIntent::FocusWeekStart, &state, monday_first()).focused,
        Some(day(2024, 6, 3))
    );
    assert_eq!(
        handle(NavIntent::FocusWeekEnd, &state, monday_first()).focused,
        Some(day(2024, 6, 9))
    );
}

#[test]
fn swipe_direction_flips_under_rtl() {
    let state = NavigationState::at(day(2024, 6, 1));
    let left = handle(NavIntent::Swipe { direction: SwipeDirection::Left }, &state, ltr());
    assert_eq!(left.view_month, 7);
    let right = handle(NavIntent::Swipe { direction: SwipeDirection::Right }, &state, ltr());
    assert_eq!(right.view_month, 5);

    let rtl = NavContext {
        first_day: Weekday::Sat,
        rtl: true,
    };
    let left = handle(NavIntent::Swipe { direction: SwipeDirection::Left }, &state, rtl);
    assert_eq!(left.view_month, 5);
}

#[test]
fn view_mode_switch_keeps_the_month() {
    let state = NavigationState::at(day(2024, 6, 1));
    let next = handle(NavIntent::SetViewMode { mode: ViewMode::Decade }, &state, ltr());
    assert_eq!(next.view_mode, ViewMode::Decade);
    assert!(next.same_view(&state));
}

#[test]
fn intents_deserialize_from_tagged_json() {
    let intent: NavIntent =
        serde_json::from_str(r#"{"type": "monthDelta", "months": -2}"#).unwrap();
    assert_eq!(intent, NavIntent::MonthDelta { months: -2 });
    let intent: NavIntent =
        serde_json::from_str(r#"{"type": "swipe", "direction": "left"}"#).unwrap();
    assert_eq!(intent, NavIntent::Swipe { direction: SwipeDirection::Left });
}

// ---------------------------------------------------------------------------
// Key table
// ---------------------------------------------------------------------------

#[test]
fn arrows_move_by_day_and_week() {
    let nav = |press, rtl| match builtin(press, rtl) {
        Some(KeyCommand::Navigate { intent }) => intent,
        other => panic!("expected navigation, got {:?}", other),
    };
    assert_eq!(nav(KeyPress::new(Key::ArrowRight), false), NavIntent::MoveFocus { days: 1 });
    assert_eq!(nav(KeyPress::new(Key::ArrowLeft), false), NavIntent::MoveFocus { days: -1 });
    assert_eq!(nav(KeyPress::new(Key::ArrowLeft), true), NavIntent::MoveFocus { days: 1 });
    assert_eq!(nav(KeyPress::new(Key::ArrowDown), true), NavIntent::MoveFocus { days: 7 });
    assert_eq!(nav(KeyPress::new(Key::PageUp), false), NavIntent::MonthDelta { months: -1 });
    assert_eq!(nav(KeyPress::shifted(Key::PageDown), false), NavIntent::YearDelta { years: 1 });
    assert_eq!(nav(KeyPress::new(Key::Home), false), NavIntent::FocusWeekStart);
}

#[test]
fn selection_and_shortcut_keys() {
    assert_eq!(builtin(KeyPress::new(Key::Enter), false), Some(KeyCommand::SelectFocused));
    assert_eq!(builtin(KeyPress::new(Key::Space), false), Some(KeyCommand::SelectFocused));
    assert_eq!(builtin(KeyPress::new(Key::Escape), false), Some(KeyCommand::Close));
    assert_eq!(
        builtin(KeyPress::new(Key::Char('T')), false),
        Some(KeyCommand::SelectRelative { days: 0 })
    );
    assert_eq!(
        builtin(KeyPress::new(Key::Char('y')), false),
        Some(KeyCommand::SelectRelative { days: -1 })
    );
    assert_eq!(builtin(KeyPress::new(Key::Char('x')), false), None);
}

#[test]
fn dom_key_names() {
    assert_eq!(Key::from_dom("ArrowUp"), Some(Key::ArrowUp));
    assert_eq!(Key::from_dom(" "), Some(Key::Space));
    assert_eq!(Key::from_dom("t"), Some(Key::Char('t')));
    assert_eq!(Key::from_dom("F13"), None);
}

#[test]
fn hook_runs_before_everything() {
    let bindings = KeyBindings::new().hook(|press, _| press.key == Key::ArrowRight);
    let state = NavigationState::at(day(2024, 6, 1));
    assert_eq!(
        map_key(KeyPress::new(Key::ArrowRight), &state, false, &bindings),
        KeyResolution::HandledByHook
    );
    assert!(matches!(
        map_key(KeyPress::new(Key::ArrowLeft), &state, false, &bindings),
        KeyResolution::Command(_)
    ));
}

#[test]
fn shortcuts_override_builtins() {
    let bindings = KeyBindings::new().bind(KeyPress::new(Key::Char('x')), KeyCommand::Close);
    let state = NavigationState::at(day(2024, 6, 1));
    assert_eq!(
        map_key(KeyPress::new(Key::Char('x')), &state, false, &bindings),
        KeyResolution::Command(KeyCommand::Close)
    );
    assert_eq!(
        map_key(KeyPress::new(Key::Char('q')), &state, false, &bindings),
        KeyResolution::Unhandled
    );
}

// ---------------------------------------------------------------------------
// Picker integration
// ---------------------------------------------------------------------------

#[test]
fn arrow_then_enter_selects_the_focused_day() {
    let mut p = picker();
    assert!(p.handle_key(KeyPress::new(Key::ArrowRight)));
    assert_eq!(p.navigation().focused, Some(day(2024, 6, 2)));
    assert!(p.handle_key(KeyPress::new(Key::Enter)));
    assert_eq!(
        p.value(),
        DatepickerValue::single(CalendarDate::from_date(day(2024, 6, 2)))
    );
}

#[test]
fn shortcut_letter_selects_relative_to_today() {
    let mut p = picker();
    p.handle_key(KeyPress::new(Key::Char('y')));
    assert_eq!(
        p.value(),
        DatepickerValue::single(CalendarDate::from_date(day(2024, 5, 31)))
    );
    assert_eq!(p.navigation().view_month, 5);
}

#[test]
fn escape_closes() {
    let mut p = picker();
    assert!(p.is_open());
    p.handle_key(KeyPress::new(Key::Escape));
    assert!(!p.is_open());
}

#[test]
fn hooked_key_leaves_the_picker_alone() {
    let mut p = picker().with_key_bindings(KeyBindings::new().hook(|_, _| true));
    assert!(p.handle_key(KeyPress::new(Key::ArrowDown)));
    assert_eq!(p.navigation().focused, None);
}

#[test]
fn unhandled_keys_report_false() {
    let mut p = picker();
    assert!(!p.handle_key(KeyPress::new(Key::Char('q'))));
}

#[test]
fn month_change_emits_and_regenerates() {
    let mut p = picker();
    p.next_month();
    assert_eq!(
        p.take_events(),
        vec![
            DatepickerEvent::Action(DatepickerAction::MonthChanged {
                year: 2024,
                month: 7
            }),
            DatepickerEvent::Action(DatepickerAction::CalendarGenerated {
                year: 2024,
                month: 7,
                // July 1st 2024 is a Monday.
                cells: 1 + 31
            }),
        ]
    );
    assert_eq!(p.cells().iter().flatten().count(), 31);
}

#[test]
fn focus_within_the_month_does_not_regenerate() {
    let mut p = picker();
    p.navigate(NavIntent::Focus { date: day(2024, 6, 10) });
    assert!(p.take_events().is_empty());
    p.set_view_mode(ViewMode::Year);
    assert_eq!(p.navigation().view_mode, ViewMode::Year);
    assert!(p.take_events().is_empty());
}

#[test]
fn locale_first_day_shapes_the_grid() {
    let p = Datepicker::new(DatepickerOptions::default().with_locale("de"))
        .unwrap()
        .with_today(day(2024, 6, 1));
    assert_eq!(p.first_day_of_week(), Weekday::Mon);
    assert_eq!(p.cells().iter().take_while(|c| c.is_none()).count(), 5);

    let overridden = Datepicker::new(DatepickerOptions {
        first_day_of_week: Some(Weekday::Sat),
        ..DatepickerOptions::default().with_locale("de")
    })
    .unwrap()
    .with_today(day(2024, 6, 1));
    assert_eq!(overridden.cells().iter().take_while(|c| c.is_none()).count(), 0);
}

#[test]
fn rtl_locale_swipes_backwards() {
    let mut p = Datepicker::new(DatepickerOptions::default().with_locale("he"))
        .unwrap()
        .with_today(day(2024, 6, 1));
    p.swipe(SwipeDirection::Left);
    assert_eq!(p.navigation().view_month, 5);
}

#[test]
fn out_of_range_navigation_keeps_the_picker_usable() {
    let mut p = picker();
    p.navigate(NavIntent::MoveFocus { days: i64::MAX });
    p.navigate(NavIntent::Focus { date: day(2024, 6, 10) });
    p.navigate(NavIntent::MoveFocus { days: -200_000_000 });
    assert_eq!(p.navigation().focused, Some(day(2024, 6, 10)));

    p.go_to(300_000, 6);
    assert_eq!((p.navigation().view_year, p.navigation().view_month), (2024, 6));
    assert_eq!(p.cells().len(), 36);

    p.next_month();
    assert_eq!((p.navigation().view_year, p.navigation().view_month), (2024, 7));
}

#[test]
fn relative_shortcut_beyond_the_calendar_is_ignored() {
    let bindings = KeyBindings::new().bind(
        KeyPress::new(Key::Char('z')),
        KeyCommand::SelectRelative { days: i64::MAX },
    );
    let mut p = picker().with_key_bindings(bindings);
    assert!(p.handle_key(KeyPress::new(Key::Char('z'))));
    assert_eq!(p.value(), DatepickerValue::Empty);
    assert!(p.take_events().is_empty());
}
