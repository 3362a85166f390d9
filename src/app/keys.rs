use crate::key::{Binding, KeyPress};
use crossterm::event::{KeyCode, KeyModifiers};

/// Page-level bindings. Field editing keys live on each
/// [`NumberField`](crate::field::NumberField).
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    pub toggle: Binding,
    pub reset: Binding,
    pub repeat: Binding,
    pub sign_in: Binding,
    pub next: Binding,
    pub prev: Binding,
    pub activate: Binding,
    pub help: Binding,
    pub quit: Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('s')]).with_help("space", "start"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            repeat: Binding::new(vec![KeyCode::Char('a')]).with_help("a", "auto-repeat"),
            sign_in: Binding::new(vec![KeyCode::Char('g')]).with_help("g", "sign in"),
            next: Binding::new(vec![KeyCode::Tab]).with_help("tab", "next"),
            prev: Binding::new(vec![KeyCode::BackTab]).with_help("shift+tab", "previous"),
            activate: Binding::new(vec![KeyCode::Enter]).with_help("enter", "press"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
            quit: Binding::new(vec![
                KeyPress::from(KeyCode::Char('q')),
                KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL)),
            ])
            .with_help("q", "quit"),
        }
    }
}
