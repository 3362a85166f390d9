//! Key bindings.
//!
//! A [`Binding`] groups the key presses that trigger one action together with
//! the text shown for it in the help line. Components keep their bindings in
//! a keymap struct and implement [`KeyMap`] so [`crate::help`] can render
//! them.
//!
//! ```rust
//! use interval_habit::key::Binding;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let reset = Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset");
//! let press = KeyMsg { key: KeyCode::Char('r'), modifiers: KeyModifiers::NONE };
//! assert!(reset.matches(&press));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        // Terminals report shift on upper-case letters and BackTab
        // inconsistently, so shift only counts when asked for.
        let relevant = msg.modifiers.difference(KeyModifiers::SHIFT);
        let wanted = self.modifiers.difference(KeyModifiers::SHIFT);
        relevant == wanted
    }
}

/// Help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    pub key: String,
    pub desc: String,
}

#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding is active. Disabled bindings never match and are
    /// left out of the help line.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Swaps the description while keeping the keys, e.g. "start" to "pause".
    pub fn set_desc(&mut self, desc: impl Into<String>) {
        self.help.desc = desc.into();
    }

    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Implemented by keymaps that can describe themselves in the help line.
pub trait KeyMap {
    /// Bindings for the compact, single-line help.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped into columns for the expanded help.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// True if any of `bindings` matches the key press.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_plain_key_matches() {
        let b = Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('s')]).with_help("space", "start");
        assert!(b.matches(&press(KeyCode::Char('s'), KeyModifiers::NONE)));
        assert!(b.matches(&press(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(!b.matches(&press(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_modifiers_must_agree() {
        let quit = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert!(quit.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));

        let plain = Binding::new(vec![KeyCode::Char('c')]);
        assert!(!plain.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_shift_is_ignored() {
        let back = Binding::new(vec![KeyCode::BackTab]);
        assert!(back.matches(&press(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(back.matches(&press(KeyCode::BackTab, KeyModifiers::NONE)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = Binding::new(vec![KeyCode::Char('g')]).with_help("g", "sign in");
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&press(KeyCode::Char('g'), KeyModifiers::NONE)));

        b.set_enabled(true);
        assert!(b.matches(&press(KeyCode::Char('g'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_set_desc_keeps_keys() {
        let mut b = Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start");
        b.set_desc("pause");
        assert_eq!(b.help().key, "space");
        assert_eq!(b.help().desc, "pause");
        assert_eq!(b.keys().len(), 1);
    }

    #[test]
    fn test_matches_any() {
        let a = Binding::new(vec![KeyCode::Char('a')]);
        let b = Binding::new(vec![KeyCode::Char('b')]);
        assert!(matches(&press(KeyCode::Char('b'), KeyModifiers::NONE), &[&a, &b]));
        assert!(!matches(&press(KeyCode::Char('z'), KeyModifiers::NONE), &[&a, &b]));
    }
}
