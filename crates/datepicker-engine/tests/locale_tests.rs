//! Tests for locale and translation resolution.

use chrono::Weekday;
use datepicker_engine::locale::{canonical_tag, language_code, translate, CalendarSystem};
use datepicker_engine::{LocaleData, LocaleRegistry, TranslationRegistry, Translations};

fn registry() -> LocaleRegistry {
    LocaleRegistry::with_builtins()
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[test]
fn tags_are_canonicalized() {
    assert_eq!(canonical_tag("en_gb"), "en-GB");
    assert_eq!(canonical_tag("EN-us"), "en-US");
    assert_eq!(canonical_tag("zh-hant-tw"), "zh-Hant-TW");
    assert_eq!(language_code("pt-BR"), "pt");
}

// ---------------------------------------------------------------------------
// Resolution chain
// ---------------------------------------------------------------------------

#[test]
fn unknown_locale_falls_back_to_default() {
    let registry = registry();
    assert_eq!(registry.resolution_chain("xx-YY"), vec!["en-US"]);

    let resolved = registry.resolve("xx-YY");
    assert_eq!(resolved.tag, "xx-YY");
    assert_eq!(resolved.first_day_of_week, Weekday::Sun);
    assert_eq!(resolved.month_name(1), "January");
    assert!(!resolved.rtl);
}

#[test]
fn language_entry_is_consulted_after_exact() {
    let mut registry = registry();
    registry.register(
        "xx",
        LocaleData {
            first_day_of_week: Some(Weekday::Wed),
            ..LocaleData::default()
        },
    );
    assert_eq!(registry.resolution_chain("xx-YY"), vec!["xx", "en-US"]);
    assert_eq!(registry.resolve("xx-YY").first_day_of_week, Weekday::Wed);
}

#[test]
fn regional_variant_inherits_from_its_language() {
    let registry = registry();
    assert_eq!(registry.resolution_chain("ar-SA"), vec!["ar-SA", "ar", "en-US"]);

    let resolved = registry.resolve("ar-SA");
    assert_eq!(resolved.first_day_of_week, Weekday::Sun);
    assert_eq!(resolved.calendar_system, CalendarSystem::IslamicUmalqura);
    assert!(resolved.rtl);
    assert_eq!(resolved.month_name(1), "يناير");
}

#[test]
fn declared_fallback_pointer_is_followed() {
    let registry = registry();
    assert_eq!(registry.resolution_chain("en-GB"), vec!["en-GB", "en-US"]);
    let resolved = registry.resolve("en-GB");
    assert_eq!(resolved.first_day_of_week, Weekday::Mon);
    assert_eq!(resolved.month_name(12), "December");
}

#[test]
fn common_fallback_map() {
    let registry = registry();
    assert_eq!(registry.resolution_chain("nb-NO"), vec!["no", "en-US"]);
    assert_eq!(registry.resolve("nb-NO").month_name(3), "mars");
    assert_eq!(registry.resolution_chain("iw"), vec!["he", "en-US"]);
}

#[test]
fn language_only_match() {
    let registry = registry();
    assert_eq!(registry.resolution_chain("fr-CA"), vec!["fr", "en-US"]);
    assert_eq!(registry.resolve("fr-CA").weekday_name(Weekday::Mon), "lundi");
}

#[test]
fn fallback_cycles_terminate() {
    let mut registry = LocaleRegistry::new();
    registry.register(
        "aa",
        LocaleData {
            fallback_locale: Some("bb".to_string()),
            ..LocaleData::default()
        },
    );
    registry.register(
        "bb",
        LocaleData {
            fallback_locale: Some("aa".to_string()),
            ..LocaleData::default()
        },
    );
    assert_eq!(registry.resolution_chain("aa"), vec!["aa", "bb"]);
}

#[test]
fn re_registration_replaces() {
    let mut registry = registry();
    registry.register(
        "de",
        LocaleData {
            first_day_of_week: Some(Weekday::Sun),
            ..LocaleData::default()
        },
    );
    let resolved = registry.resolve("de");
    assert_eq!(resolved.first_day_of_week, Weekday::Sun);
    assert_eq!(resolved.month_name(6), "June");
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

#[test]
fn short_names_default_to_three_letters() {
    let resolved = registry().resolve("en-US");
    assert_eq!(resolved.month_name_short(9), "Sep");
    assert_eq!(resolved.weekday_name_short(Weekday::Thu), "Thu");
}

#[test]
fn explicit_short_names_are_kept() {
    let resolved = registry().resolve("de");
    assert_eq!(resolved.weekday_name_short(Weekday::Sat), "Sa");
    assert_eq!(resolved.month_name(3), "März");
}

#[test]
fn out_of_range_month_is_blank() {
    let resolved = registry().resolve("en-US");
    assert_eq!(resolved.month_name(0), "");
    assert_eq!(resolved.month_name(13), "");
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

#[test]
fn translation_follows_the_chain_per_key() {
    let registry = TranslationRegistry::with_builtins();
    assert_eq!(registry.translate("de-AT", "today"), "Heute");
    assert_eq!(registry.translate("de-AT", "previousYear"), "Previous year");
    assert_eq!(registry.translate("xx", "missingKey"), "missingKey");
}

#[test]
fn registered_translations_take_effect() {
    let mut registry = TranslationRegistry::with_builtins();
    registry.register("pt-BR", Translations::from_pairs(&[("today", "Hoje")]));
    assert_eq!(registry.translate("pt", "today"), "Hoje");
    assert_eq!(registry.translate("pt", "clear"), "Clear");

    let merged = registry.resolve("pt-BR");
    assert_eq!(merged.get("today"), Some("Hoje"));
    assert_eq!(merged.get("nextMonth"), Some("Next month"));
}

#[test]
fn global_translate_uses_builtins() {
    assert_eq!(translate("es", "today"), "Hoy");
}
