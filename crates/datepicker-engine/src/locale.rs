//! Locale metadata and translation registries.
//!
//! Both registries share one lookup algorithm ([`Registry`]). A requested
//! locale resolves through, in order:
//!
//! 1. the exact tag (`ar-SA`),
//! 2. its bare language code (`ar`),
//! 3. any `fallback_locale` declared by entries found so far,
//! 4. a static map of common language substitutions (`nb` -> `no`, ...),
//! 5. the registry's default locale.
//!
//! Entries may be partial; [`Registry::resolve`] fills missing fields from
//! later entries in the chain, so resolution never fails.
//!
//! Process-wide instances live behind [`LocaleRegistry::global`] and
//! [`TranslationRegistry::global`]. They are populated at startup and read
//! afterwards; the `RwLock` only guards against concurrent registration.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use chrono::{Month, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_LOCALE: &str = "en-US";

/// Common substitutions for languages without their own entry.
const COMMON_FALLBACKS: &[(&str, &str)] = &[
    ("nb", "no"),
    ("nn", "no"),
    ("zh", "zh-CN"),
    ("zh-HK", "zh-TW"),
    ("zh-MO", "zh-TW"),
    ("zh-SG", "zh-CN"),
    ("pt", "pt-BR"),
    ("iw", "he"),
    ("fil", "tl"),
];

/// An entry that may defer missing fields to another locale.
pub trait Layered: Clone + Default {
    fn fallback_locale(&self) -> Option<&str>;

    /// Copy every field `self` lacks from `lower`.
    fn merge_missing(&mut self, lower: &Self);
}

/// Canonical BCP 47-ish casing: `en_us` -> `en-US`, `zh-hant` -> `zh-Hant`.
pub fn canonical_tag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(i, part)| match (i, part.len()) {
            (0, _) => part.to_ascii_lowercase(),
            (_, 2) => part.to_ascii_uppercase(),
            (_, 4) => {
                let lower = part.to_ascii_lowercase();
                let mut chars = lower.chars();
                chars
                    .next()
                    .map(|c| c.to_ascii_uppercase().to_string() + chars.as_str())
                    .unwrap_or_default()
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// The language subtag of a locale (`ar` for `ar-SA`).
pub fn language_code(tag: &str) -> String {
    canonical_tag(tag)
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Locale-keyed entries with fallback resolution.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: HashMap<String, T>,
    default_locale: String,
}

impl<T: Layered> Registry<T> {
    pub fn new(default_locale: &str) -> Self {
        Self {
            entries: HashMap::new(),
            default_locale: canonical_tag(default_locale),
        }
    }

    /// Register `data` under `locale`, replacing any previous entry.
    pub fn register(&mut self, locale: &str, data: T) {
        let tag = canonical_tag(locale);
        debug!(locale = %tag, "registering locale entry");
        self.entries.insert(tag, data);
    }

    pub fn get(&self, locale: &str) -> Option<&T> {
        self.entries.get(&canonical_tag(locale))
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.get(locale).is_some()
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Registered tags consulted for `locale`, most specific first.
    pub fn resolution_chain(&self, locale: &str) -> Vec<String> {
        let exact = canonical_tag(locale);
        let language = language_code(&exact);
        let mut chain: Vec<String> = Vec::new();

        self.push_registered(&mut chain, &exact);
        self.push_registered(&mut chain, &language);
        self.follow_pointers(&mut chain, 0);

        let followed = chain.len();
        for tag in [&exact, &language] {
            if let Some((_, target)) = COMMON_FALLBACKS
                .iter()
                .find(|(from, _)| *from == tag.as_str())
            {
                self.push_registered(&mut chain, target);
            }
        }
        self.follow_pointers(&mut chain, followed);

        let default = self.default_locale.clone();
        self.push_registered(&mut chain, &default);
        chain
    }

    /// Merge every entry along the chain into one fully-resolved entry.
    pub fn resolve(&self, locale: &str) -> T {
        let mut merged = T::default();
        for tag in self.resolution_chain(locale) {
            if let Some(entry) = self.entries.get(&tag) {
                merged.merge_missing(entry);
            }
        }
        merged
    }

    fn push_registered(&self, chain: &mut Vec<String>, tag: &str) {
        let tag = canonical_tag(tag);
        if self.entries.contains_key(&tag) && !chain.contains(&tag) {
            chain.push(tag);
        }
    }

    /// Append declared fallbacks of `chain[from..]`, including ones reached transitively.
    fn follow_pointers(&self, chain: &mut Vec<String>, from: usize) {
        let mut i = from;
        while i < chain.len() {
            let pointer = self
                .entries
                .get(&chain[i])
                .and_then(|e| e.fallback_locale())
                .map(str::to_string);
            if let Some(target) = pointer {
                self.push_registered(chain, &target);
            }
            i += 1;
        }
    }
}

/// Calendar system used by a locale. Grids are always Gregorian; the tag is
/// metadata for renderers and formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarSystem {
    #[default]
    Gregorian,
    Islamic,
    IslamicUmalqura,
    Persian,
    Hebrew,
    Buddhist,
    Japanese,
}

/// Calendar metadata for one locale. Every field is optional so that regional
/// entries can override only what differs from their parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleData {
    pub calendar_system: Option<CalendarSystem>,
    pub first_day_of_week: Option<Weekday>,
    pub rtl: Option<bool>,
    /// January first.
    pub month_names: Option<Vec<String>>,
    pub month_names_short: Option<Vec<String>>,
    /// Sunday first.
    pub weekday_names: Option<Vec<String>>,
    pub weekday_names_short: Option<Vec<String>>,
    pub fallback_locale: Option<String>,
}

impl Layered for LocaleData {
    fn fallback_locale(&self) -> Option<&str> {
        self.fallback_locale.as_deref()
    }

    fn merge_missing(&mut self, lower: &Self) {
        fn fill<V: Clone>(slot: &mut Option<V>, lower: &Option<V>) {
            if slot.is_none() {
                slot.clone_from(lower);
            }
        }
        fill(&mut self.calendar_system, &lower.calendar_system);
        fill(&mut self.first_day_of_week, &lower.first_day_of_week);
        fill(&mut self.rtl, &lower.rtl);
        fill(&mut self.month_names, &lower.month_names);
        fill(&mut self.month_names_short, &lower.month_names_short);
        fill(&mut self.weekday_names, &lower.weekday_names);
        fill(&mut self.weekday_names_short, &lower.weekday_names_short);
    }
}

/// Fully-populated locale metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocale {
    pub tag: String,
    pub calendar_system: CalendarSystem,
    pub first_day_of_week: Weekday,
    pub rtl: bool,
    pub month_names: Vec<String>,
    pub month_names_short: Vec<String>,
    pub weekday_names: Vec<String>,
    pub weekday_names_short: Vec<String>,
}

impl ResolvedLocale {
    fn from_data(tag: &str, data: LocaleData) -> Self {
        let month_names = complete(data.month_names, 12, english_month_name);
        let month_names_short = data
            .month_names_short
            .filter(|v| v.len() == 12)
            .unwrap_or_else(|| month_names.iter().map(|n| abbreviate(n)).collect());
        let weekday_names = complete(data.weekday_names, 7, english_weekday_name);
        let weekday_names_short = data
            .weekday_names_short
            .filter(|v| v.len() == 7)
            .unwrap_or_else(|| weekday_names.iter().map(|n| abbreviate(n)).collect());
        Self {
            tag: canonical_tag(tag),
            calendar_system: data.calendar_system.unwrap_or_default(),
            first_day_of_week: data.first_day_of_week.unwrap_or(Weekday::Sun),
            rtl: data.rtl.unwrap_or(false),
            month_names,
            month_names_short,
            weekday_names,
            weekday_names_short,
        }
    }

    /// Name of `month` (1..=12).
    pub fn month_name(&self, month: u32) -> &str {
        pick(&self.month_names, month.wrapping_sub(1))
    }

    pub fn month_name_short(&self, month: u32) -> &str {
        pick(&self.month_names_short, month.wrapping_sub(1))
    }

    pub fn weekday_name(&self, day: Weekday) -> &str {
        pick(&self.weekday_names, day.num_days_from_sunday())
    }

    pub fn weekday_name_short(&self, day: Weekday) -> &str {
        pick(&self.weekday_names_short, day.num_days_from_sunday())
    }
}

fn pick(names: &[String], index: u32) -> &str {
    names.get(index as usize).map(String::as_str).unwrap_or("")
}

fn complete(names: Option<Vec<String>>, len: usize, english: fn(usize) -> String) -> Vec<String> {
    match names {
        Some(v) if v.len() == len => v,
        _ => (0..len).map(english).collect(),
    }
}

fn english_month_name(i: usize) -> String {
    Month::try_from(i as u8 + 1)
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

fn english_weekday_name(i: usize) -> String {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    NAMES[i % 7].to_string()
}

fn abbreviate(name: &str) -> String {
    name.chars().take(3).collect()
}

fn names(list: &[&str]) -> Option<Vec<String>> {
    Some(list.iter().map(|s| s.to_string()).collect())
}

/// Calendar metadata registry.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    inner: Registry<LocaleData>,
}

impl LocaleRegistry {
    /// An empty registry defaulting to [`DEFAULT_LOCALE`].
    pub fn new() -> Self {
        Self {
            inner: Registry::new(DEFAULT_LOCALE),
        }
    }

    /// A registry preloaded with the built-in locales.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (tag, data) in builtin_locales() {
            registry.register(tag, data);
        }
        registry
    }

    /// The process-wide registry, created with the built-ins on first use.
    pub fn global() -> &'static RwLock<LocaleRegistry> {
        static GLOBAL: OnceLock<RwLock<LocaleRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(LocaleRegistry::with_builtins()))
    }

    pub fn register(&mut self, locale: &str, data: LocaleData) {
        self.inner.register(locale, data);
    }

    pub fn get(&self, locale: &str) -> Option<&LocaleData> {
        self.inner.get(locale)
    }

    pub fn resolution_chain(&self, locale: &str) -> Vec<String> {
        self.inner.resolution_chain(locale)
    }

    pub fn resolve(&self, locale: &str) -> ResolvedLocale {
        ResolvedLocale::from_data(locale, self.inner.resolve(locale))
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `locale` against the process-wide registry.
pub fn resolve_locale(locale: &str) -> ResolvedLocale {
    match LocaleRegistry::global().read() {
        Ok(registry) => registry.resolve(locale),
        Err(poisoned) => poisoned.into_inner().resolve(locale),
    }
}

/// UI strings for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Translations {
    pub strings: HashMap<String, String>,
    pub fallback_locale: Option<String>,
}

impl Translations {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            strings: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fallback_locale: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

impl Layered for Translations {
    fn fallback_locale(&self) -> Option<&str> {
        self.fallback_locale.as_deref()
    }

    fn merge_missing(&mut self, lower: &Self) {
        for (key, value) in &lower.strings {
            self.strings
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// Translation table registry.
#[derive(Debug, Clone)]
pub struct TranslationRegistry {
    inner: Registry<Translations>,
}

impl TranslationRegistry {
    pub fn new() -> Self {
        Self {
            inner: Registry::new(DEFAULT_LOCALE),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (tag, table) in builtin_translations() {
            registry.register(tag, table);
        }
        registry
    }

    pub fn global() -> &'static RwLock<TranslationRegistry> {
        static GLOBAL: OnceLock<RwLock<TranslationRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(TranslationRegistry::with_builtins()))
    }

    pub fn register(&mut self, locale: &str, table: Translations) {
        self.inner.register(locale, table);
    }

    pub fn resolve(&self, locale: &str) -> Translations {
        self.inner.resolve(locale)
    }

    /// First translation of `key` along the chain; the key itself when none exists.
    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.inner
            .resolution_chain(locale)
            .iter()
            .find_map(|tag| self.inner.get(tag).and_then(|t| t.get(key)))
            .unwrap_or(key)
            .to_string()
    }
}

impl Default for TranslationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate `key` against the process-wide registry.
pub fn translate(locale: &str, key: &str) -> String {
    match TranslationRegistry::global().read() {
        Ok(registry) => registry.translate(locale, key),
        Err(poisoned) => poisoned.into_inner().translate(locale, key),
    }
}

fn builtin_locales() -> Vec<(&'static str, LocaleData)> {
    vec![
        (
            "en-US",
            LocaleData {
                calendar_system: Some(CalendarSystem::Gregorian),
                first_day_of_week: Some(Weekday::Sun),
                rtl: Some(false),
                month_names: Some((0..12).map(english_month_name).collect()),
                weekday_names: Some((0..7).map(english_weekday_name).collect()),
                ..LocaleData::default()
            },
        ),
        (
            "en-GB",
            LocaleData {
                first_day_of_week: Some(Weekday::Mon),
                fallback_locale: Some("en-US".to_string()),
                ..LocaleData::default()
            },
        ),
        (
            "de",
            LocaleData {
                first_day_of_week: Some(Weekday::Mon),
                rtl: Some(false),
                month_names: names(&[
                    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
                    "September", "Oktober", "November", "Dezember",
                ]),
                weekday_names: names(&[
                    "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag",
                    "Samstag",
                ]),
                weekday_names_short: names(&["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"]),
                ..LocaleData::default()
            },
        ),
        (
            "fr",
            LocaleData {
                first_day_of_week: Some(Weekday::Mon),
                rtl: Some(false),
                month_names: names(&[
                    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
                    "septembre", "octobre", "novembre", "décembre",
                ]),
                weekday_names: names(&[
                    "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
                ]),
                ..LocaleData::default()
            },
        ),
        (
            "es",
            LocaleData {
                first_day_of_week: Some(Weekday::Mon),
                rtl: Some(false),
                month_names: names(&[
                    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
                    "septiembre", "octubre", "noviembre", "diciembre",
                ]),
                weekday_names: names(&[
                    "domingo", "lunes", "martes", "miércoles", "jueves", "viernes", "sábado",
                ]),
                ..LocaleData::default()
            },
        ),
        (
            "no",
            LocaleData {
                first_day_of_week: Some(Weekday::Mon),
                rtl: Some(false),
                month_names: names(&[
                    "januar", "februar", "mars", "april", "mai", "juni", "juli", "august",
                    "september", "oktober", "november", "desember",
                ]),
                weekday_names: names(&[
                    "søndag", "mandag", "tirsdag", "onsdag", "torsdag", "fredag", "lørdag",
                ]),
                ..LocaleData::default()
            },
        ),
        (
            "ar",
            LocaleData {
                first_day_of_week: Some(Weekday::Sat),
                rtl: Some(true),
                month_names: names(&[
                    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس",
                    "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر",
                ]),
                weekday_names: names(&[
                    "الأحد", "الاثنين", "الثلاثاء", "الأربعاء", "الخميس", "الجمعة", "السبت",
                ]),
                ..LocaleData::default()
            },
        ),
        (
            "ar-SA",
            LocaleData {
                calendar_system: Some(CalendarSystem::IslamicUmalqura),
                first_day_of_week: Some(Weekday::Sun),
                fallback_locale: Some("ar".to_string()),
                ..LocaleData::default()
            },
        ),
        (
            "he",
            LocaleData {
                first_day_of_week: Some(Weekday::Sun),
                rtl: Some(true),
                month_names: names(&[
                    "ינואר", "פברואר", "מרץ", "אפריל", "מאי", "יוני", "יולי", "אוגוסט",
                    "ספטמבר", "אוקטובר", "נובמבר", "דצמבר",
                ]),
                weekday_names: names(&[
                    "יום ראשון", "יום שני", "יום שלישי", "יום רביעי", "יום חמישי", "יום שישי",
                    "שבת",
                ]),
                ..LocaleData::default()
            },
        ),
        (
            "fa",
            LocaleData {
                calendar_system: Some(CalendarSystem::Persian),
                first_day_of_week: Some(Weekday::Sat),
                rtl: Some(true),
                fallback_locale: Some("en-US".to_string()),
                ..LocaleData::default()
            },
        ),
        (
            "ja",
            LocaleData {
                first_day_of_week: Some(Weekday::Sun),
                rtl: Some(false),
                month_names: Some((1..=12).map(|m| format!("{}月", m)).collect()),
                weekday_names: names(&[
                    "日曜日", "月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日",
                ]),
                weekday_names_short: names(&["日", "月", "火", "水", "木", "金", "土"]),
                ..LocaleData::default()
            },
        ),
    ]
}

fn builtin_translations() -> Vec<(&'static str, Translations)> {
    vec![
        (
            "en-US",
            Translations::from_pairs(&[
                ("today", "Today"),
                ("clear", "Clear"),
                ("close", "Close"),
                ("selectDate", "Select date"),
                ("selectTime", "Select time"),
                ("previousMonth", "Previous month"),
                ("nextMonth", "Next month"),
                ("previousYear", "Previous year"),
                ("nextYear", "Next year"),
                ("rangeStart", "Start date"),
                ("rangeEnd", "End date"),
                ("datesSelected", "dates selected"),
                ("am", "AM"),
                ("pm", "PM"),
            ]),
        ),
        (
            "de",
            Translations::from_pairs(&[
                ("today", "Heute"),
                ("clear", "Löschen"),
                ("close", "Schließen"),
                ("selectDate", "Datum auswählen"),
                ("previousMonth", "Vorheriger Monat"),
                ("nextMonth", "Nächster Monat"),
                ("rangeStart", "Startdatum"),
                ("rangeEnd", "Enddatum"),
                ("datesSelected", "Daten ausgewählt"),
            ]),
        ),
        (
            "fr",
            Translations::from_pairs(&[
                ("today", "Aujourd'hui"),
                ("clear", "Effacer"),
                ("close", "Fermer"),
                ("selectDate", "Choisir une date"),
                ("previousMonth", "Mois précédent"),
                ("nextMonth", "Mois suivant"),
                ("datesSelected", "dates sélectionnées"),
            ]),
        ),
        (
            "es",
            Translations::from_pairs(&[
                ("today", "Hoy"),
                ("clear", "Borrar"),
                ("close", "Cerrar"),
                ("selectDate", "Seleccionar fecha"),
                ("previousMonth", "Mes anterior"),
                ("nextMonth", "Mes siguiente"),
                ("datesSelected", "fechas seleccionadas"),
            ]),
        ),
        (
            "ar",
            Translations::from_pairs(&[
                ("today", "اليوم"),
                ("clear", "مسح"),
                ("close", "إغلاق"),
                ("selectDate", "اختر التاريخ"),
                ("previousMonth", "الشهر السابق"),
                ("nextMonth", "الشهر التالي"),
            ]),
        ),
    ]
}
