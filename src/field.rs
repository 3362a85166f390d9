//! Form controls for the timer card: bounded number fields and an on/off
//! switch.
//!
//! Number fields behave like a controlled numeric input: every keystroke is
//! applied and the result is clamped straight away, so the field never
//! holds an out-of-range value and nothing is ever rejected.

use crate::key::Binding;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;

/// Labels are padded to this many columns so the controls line up.
const LABEL_WIDTH: usize = 11;

#[derive(Debug, Clone)]
pub struct FieldKeyMap {
    pub increment: Binding,
    pub decrement: Binding,
    pub delete: Binding,
    pub clear: Binding,
}

impl Default for FieldKeyMap {
    fn default() -> Self {
        Self {
            increment: Binding::new(vec![KeyCode::Up, KeyCode::Char('+')]).with_help("↑/+", "increase"),
            decrement: Binding::new(vec![KeyCode::Down, KeyCode::Char('-')]).with_help("↓/-", "decrease"),
            delete: Binding::new(vec![KeyCode::Backspace]).with_help("backspace", "delete digit"),
            clear: Binding::new(vec![KeyCode::Delete]).with_help("del", "clear"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Styles {
    pub label: Style,
    pub value: Style,
    pub focused_value: Style,
    pub hint: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            label: Style::new().bold(true),
            value: Style::new().foreground(Color::from("#A0A0A0")),
            focused_value: Style::new().foreground(Color::from("#EE6FF8")).bold(true),
            hint: Style::new().foreground(Color::from("#606060")),
        }
    }
}

/// A labelled integer input bounded to `min..=max`.
#[derive(Debug, Clone)]
pub struct NumberField {
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub key_map: FieldKeyMap,
    pub styles: Styles,
    value: u32,
    focus: bool,
}

impl NumberField {
    pub fn new(label: impl Into<String>, min: u32, max: u32) -> Self {
        Self {
            label: label.into(),
            min,
            max,
            key_map: FieldKeyMap::default(),
            styles: Styles::default(),
            value: min,
            focus: false,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Sets the value from raw input, clamped into range.
    pub fn set_value(&mut self, raw: i64) {
        self.value = raw.clamp(self.min as i64, self.max as i64) as u32;
    }

    /// Applies a key press. Returns `true` when the value changed.
    pub fn handle_key(&mut self, key: &KeyMsg) -> bool {
        if !self.focus {
            return false;
        }
        let before = self.value;
        let current = self.value as i64;

        if self.key_map.increment.matches(key) {
            self.set_value(current + 1);
        } else if self.key_map.decrement.matches(key) {
            self.set_value(current - 1);
        } else if self.key_map.delete.matches(key) {
            self.set_value(current / 10);
        } else if self.key_map.clear.matches(key) {
            self.set_value(0);
        } else if let KeyCode::Char(c) = key.key {
            if let Some(d) = c.to_digit(10) {
                self.set_value(current * 10 + d as i64);
            }
        }
        self.value != before
    }

    /// bubbletea-style entry point; the value is read back with
    /// [`NumberField::value`].
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key);
        }
        None
    }

    pub fn view(&self) -> String {
        let value = if self.focus {
            self.styles.focused_value.render(&format!("‹ {:>3} ›", self.value))
        } else {
            self.styles.value.render(&format!("  {:>3}  ", self.value))
        };
        format!(
            "{} {} {}",
            self.styles.label.render(&format!("{:<LABEL_WIDTH$}", self.label)),
            value,
            self.styles.hint.render(&format!("({}-{})", self.min, self.max))
        )
    }
}

impl Component for NumberField {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

/// A labelled on/off toggle.
#[derive(Debug, Clone)]
pub struct Switch {
    pub label: String,
    pub description: String,
    pub styles: Styles,
    on: bool,
    focus: bool,
}

impl Switch {
    pub fn new(label: impl Into<String>, description: impl Into<String>, on: bool) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            styles: Styles::default(),
            on,
            focus: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn set(&mut self, on: bool) {
        self.on = on;
    }

    /// Flips the switch and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }

    pub fn view(&self) -> String {
        let knob = if self.on { "[■ on ]" } else { "[off □]" };
        let knob = if self.focus {
            self.styles.focused_value.render(knob)
        } else {
            self.styles.value.render(knob)
        };
        format!(
            "{} {}  {}",
            self.styles.label.render(&format!("{:<LABEL_WIDTH$}", self.label)),
            knob,
            self.styles.hint.render(&self.description)
        )
    }
}

impl Component for Switch {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use lipgloss_extras::lipgloss;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn minutes() -> NumberField {
        let mut f = NumberField::new("Minutes", 0, 180);
        f.focus();
        f
    }

    #[test]
    fn test_typing_digits_builds_value() {
        let mut f = minutes();
        assert!(!f.handle_key(&key(KeyCode::Char('0'))));
        assert!(f.handle_key(&key(KeyCode::Char('4'))));
        assert!(f.handle_key(&key(KeyCode::Char('5'))));
        assert_eq!(f.value(), 45);
    }

    #[test]
    fn test_typing_past_max_clamps() {
        let mut f = minutes();
        for c in ['2', '0', '0'] {
            f.handle_key(&key(KeyCode::Char(c)));
        }
        assert_eq!(f.value(), 180);
    }

    #[test]
    fn test_seconds_clamp_to_59() {
        let mut f = NumberField::new("Seconds", 0, 59);
        f.focus();
        f.handle_key(&key(KeyCode::Char('7')));
        f.handle_key(&key(KeyCode::Char('5')));
        assert_eq!(f.value(), 59);
    }

    #[test]
    fn test_arrows_and_backspace() {
        let mut f = minutes();
        f.set_value(12);
        f.handle_key(&key(KeyCode::Up));
        assert_eq!(f.value(), 13);
        f.handle_key(&key(KeyCode::Backspace));
        assert_eq!(f.value(), 1);
        f.handle_key(&key(KeyCode::Down));
        f.handle_key(&key(KeyCode::Down));
        assert_eq!(f.value(), 0);
        f.set_value(77);
        f.handle_key(&key(KeyCode::Delete));
        assert_eq!(f.value(), 0);
    }

    #[test]
    fn test_letters_are_ignored() {
        let mut f = minutes();
        f.set_value(3);
        assert!(!f.handle_key(&key(KeyCode::Char('x'))));
        assert_eq!(f.value(), 3);
    }

    #[test]
    fn test_blurred_field_ignores_keys() {
        let mut f = minutes();
        f.blur();
        assert!(!f.focused());
        assert!(!f.handle_key(&key(KeyCode::Char('9'))));
        assert_eq!(f.value(), 0);
    }

    #[test]
    fn test_set_value_clamps_negative() {
        let mut f = minutes();
        f.set_value(-20);
        assert_eq!(f.value(), 0);
    }

    #[test]
    fn test_update_forwards_key_messages() {
        let mut f = minutes();
        let msg: Msg = Box::new(key(KeyCode::Char('7')));
        assert!(f.update(&msg).is_none());
        assert_eq!(f.value(), 7);
    }

    #[test]
    fn test_views() {
        let mut f = minutes();
        f.set_value(2);
        let view = lipgloss::strip_ansi(&f.view());
        assert!(view.starts_with("Minutes     ‹"));
        assert!(view.contains("‹   2 ›"));
        assert!(view.contains("(0-180)"));

        let mut s = Switch::new("Auto-repeat", "Restart interval automatically", true);
        assert!(lipgloss::strip_ansi(&s.view()).starts_with("Auto-repeat [■ on ]"));
        assert!(!s.toggle());
        assert!(lipgloss::strip_ansi(&s.view()).contains("off"));
    }
}
