//! Tests for selectability rules and the memoizing evaluator.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use datepicker_engine::constraints::StaticHolidays;
use datepicker_engine::{is_selectable, ConstraintConfig, ConstraintEvaluator, DateRange};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Individual rules
// ---------------------------------------------------------------------------

#[test]
fn unconstrained_days_are_selectable() {
    assert!(is_selectable(day(2024, 6, 15), &ConstraintConfig::default()));
}

#[test]
fn min_and_max_are_inclusive_calendar_days() {
    let config = ConstraintConfig::new()
        .min_date(day(2024, 6, 10))
        .max_date(day(2024, 6, 20));
    assert!(!is_selectable(day(2024, 6, 9), &config));
    assert!(is_selectable(day(2024, 6, 10), &config));
    assert!(is_selectable(day(2024, 6, 20), &config));
    assert!(!is_selectable(day(2024, 6, 21), &config));
}

#[test]
fn disabled_dates() {
    let config = ConstraintConfig::new().disable_date(day(2024, 6, 12));
    assert!(!is_selectable(day(2024, 6, 12), &config));
    assert!(is_selectable(day(2024, 6, 13), &config));
}

#[test]
fn disabled_ranges_are_inclusive() {
    let config = ConstraintConfig::new().disable_range(day(2024, 6, 10), day(2024, 6, 12));
    assert!(is_selectable(day(2024, 6, 9), &config));
    assert!(!is_selectable(day(2024, 6, 10), &config));
    assert!(!is_selectable(day(2024, 6, 11), &config));
    assert!(!is_selectable(day(2024, 6, 12), &config));
    assert!(is_selectable(day(2024, 6, 13), &config));
}

#[test]
fn inverted_range_bounds_are_swapped() {
    let range = DateRange::new(day(2024, 6, 12), day(2024, 6, 10));
    assert_eq!(range.start, day(2024, 6, 10));
    assert!(range.contains(day(2024, 6, 11)));
}

#[test]
fn holidays_only_disable_when_asked() {
    let provider = Arc::new(StaticHolidays::new().with(day(2024, 12, 25), "Christmas Day"));
    let flagged = ConstraintConfig::new().holidays(provider.clone(), false);
    assert!(is_selectable(day(2024, 12, 25), &flagged));
    assert!(flagged.is_holiday(day(2024, 12, 25)));
    assert_eq!(
        flagged.holiday_label(day(2024, 12, 25)).as_deref(),
        Some("Christmas Day")
    );

    let disabling = ConstraintConfig::new().holidays(provider, true);
    assert!(!is_selectable(day(2024, 12, 25), &disabling));
    assert!(is_selectable(day(2024, 12, 24), &disabling));
}

#[test]
fn custom_predicate_disables_matching_days() {
    let weekdays_only = ConstraintConfig::new()
        .predicate(|d: NaiveDate| matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
    assert!(!is_selectable(day(2024, 6, 15), &weekdays_only)); // Saturday
    assert!(is_selectable(day(2024, 6, 17), &weekdays_only)); // Monday
}

#[test]
fn earlier_rules_short_circuit_the_predicate() {
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen = calls.clone();
    let config = ConstraintConfig::new()
        .min_date(day(2024, 6, 10))
        .predicate(move |_| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            false
        });
    assert!(!is_selectable(day(2024, 6, 1), &config));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn evaluation_is_pure() {
    let config = ConstraintConfig::new()
        .max_date(day(2024, 6, 20))
        .disable_date(day(2024, 6, 5));
    for d in 1..=30 {
        let date = day(2024, 6, d);
        assert_eq!(is_selectable(date, &config), is_selectable(date, &config));
    }
}

// ---------------------------------------------------------------------------
// Evaluator memo
// ---------------------------------------------------------------------------

#[test]
fn evaluator_memoizes_per_day() {
    let evaluator = ConstraintEvaluator::new(ConstraintConfig::new().min_date(day(2024, 6, 10)));
    assert!(!evaluator.is_selectable(day(2024, 6, 1)));
    assert!(!evaluator.is_selectable(day(2024, 6, 1)));
    assert_eq!(evaluator.misses(), 1);
    assert_eq!(evaluator.hits(), 1);
}

#[test]
fn replacing_the_config_invalidates_the_memo() {
    let mut evaluator =
        ConstraintEvaluator::new(ConstraintConfig::new().min_date(day(2024, 6, 10)));
    let version = evaluator.version();
    assert!(!evaluator.is_selectable(day(2024, 6, 1)));

    evaluator.replace_config(ConstraintConfig::new());
    assert!(evaluator.version() > version);
    assert!(evaluator.is_selectable(day(2024, 6, 1)));
}

#[test]
fn invalidate_forces_recomputation() {
    let evaluator = ConstraintEvaluator::new(ConstraintConfig::new());
    evaluator.is_selectable(day(2024, 6, 1));
    evaluator.invalidate();
    evaluator.is_selectable(day(2024, 6, 1));
    assert_eq!(evaluator.misses(), 2);
    assert_eq!(evaluator.hits(), 0);
}
