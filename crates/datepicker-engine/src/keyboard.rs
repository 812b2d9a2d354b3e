//! Keyboard intent mapping.
//!
//! A key press resolves in three stages: the caller's hook, then the caller's
//! shortcut map, then the built-in table. The first stage that claims the key
//! wins and the later ones are skipped.
//!
//! Built-in table:
//!
//! | Key | Command |
//! |-----|---------|
//! | ArrowLeft / ArrowRight | focus -1 / +1 day (swapped for RTL) |
//! | ArrowUp / ArrowDown | focus -7 / +7 days |
//! | PageUp / PageDown | previous / next month (with Shift: year) |
//! | Home / End | first / last day of the focused week |
//! | Enter / Space | select the focused day |
//! | Escape | close |
//! | T / Y / N / W | select today / yesterday / tomorrow / a week from today |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::navigation::{NavIntent, NavigationState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Char(char),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value. Letters are lower-cased.
    pub fn from_dom(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Enter" => Key::Enter,
            " " | "Spacebar" | "Space" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    #[serde(default)]
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Letters compare case-insensitively in shortcut maps.
    fn normalized(self) -> Self {
        match self.key {
            Key::Char(c) => Self {
                key: Key::Char(c.to_ascii_lowercase()),
                ..self
            },
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeyCommand {
    Navigate { intent: NavIntent },
    SelectFocused,
    Close,
    /// Focus and select the day `days` away from today.
    SelectRelative { days: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResolution {
    /// The caller's hook consumed the key.
    HandledByHook,
    Command(KeyCommand),
    Unhandled,
}

pub type KeyHook = Arc<dyn Fn(&KeyPress, &NavigationState) -> bool + Send + Sync>;

/// Caller overrides consulted before the built-in table.
#[derive(Clone, Default)]
pub struct KeyBindings {
    shortcuts: HashMap<KeyPress, KeyCommand>,
    hook: Option<KeyHook>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, press: KeyPress, command: KeyCommand) -> Self {
        self.shortcuts.insert(press.normalized(), command);
        self
    }

    /// Install a hook; returning `true` marks the key as handled.
    pub fn hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&KeyPress, &NavigationState) -> bool + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for KeyBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBindings")
            .field("shortcuts", &self.shortcuts)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Resolve a key press against the caller's overrides and the built-in table.
pub fn map_key(
    press: KeyPress,
    state: &NavigationState,
    rtl: bool,
    bindings: &KeyBindings,
) -> KeyResolution {
    if let Some(hook) = &bindings.hook {
        if hook(&press, state) {
            return KeyResolution::HandledByHook;
        }
    }
    if let Some(command) = bindings.shortcuts.get(&press.normalized()) {
        return KeyResolution::Command(*command);
    }
    builtin(press, rtl)
        .map(KeyResolution::Command)
        .unwrap_or(KeyResolution::Unhandled)
}

/// The built-in key table.
pub fn builtin(press: KeyPress, rtl: bool) -> Option<KeyCommand> {
    let nav = |intent| Some(KeyCommand::Navigate { intent });
    let step = if rtl { -1 } else { 1 };
    match press.key {
        Key::ArrowLeft => nav(NavIntent::MoveFocus { days: -step }),
        Key::ArrowRight => nav(NavIntent::MoveFocus { days: step }),
        Key::ArrowUp => nav(NavIntent::MoveFocus { days: -7 }),
        Key::ArrowDown => nav(NavIntent::MoveFocus { days: 7 }),
        Key::PageUp if press.shift => nav(NavIntent::YearDelta { years: -1 }),
        Key::PageUp => nav(NavIntent::MonthDelta { months: -1 }),
        Key::PageDown if press.shift => nav(NavIntent::YearDelta { years: 1 }),
        Key::PageDown => nav(NavIntent::MonthDelta { months: 1 }),
        Key::Home => nav(NavIntent::FocusWeekStart),
        Key::End => nav(NavIntent::FocusWeekEnd),
        Key::Enter | Key::Space => Some(KeyCommand::SelectFocused),
        Key::Escape => Some(KeyCommand::Close),
        Key::Char(c) => match c.to_ascii_lowercase() {
            't' => Some(KeyCommand::SelectRelative { days: 0 }),
            'y' => Some(KeyCommand::SelectRelative { days: -1 }),
            'n' => Some(KeyCommand::SelectRelative { days: 1 }),
            'w' => Some(KeyCommand::SelectRelative { days: 7 }),
            _ => None,
        },
    }
}
