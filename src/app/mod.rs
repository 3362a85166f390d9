//! The Interval Habit page.
//!
//! One bubbletea model composes everything on screen: the header with the
//! Google sign-in button, the hero copy, the timer card (ring, Minutes and
//! Seconds fields, auto-repeat switch, Start/Pause and Reset, cycle count),
//! the "How it works" steps, toasts and the help line.
//!
//! [`Model::init`] takes no arguments, so `main` hands the loaded settings
//! over with [`install`] before the program starts.

mod keys;
mod view;

#[cfg(test)]
mod tests;

pub use keys::AppKeyMap;

use crate::auth::{self, AuthProvider, Session};
use crate::clock::Clock;
use crate::config::Settings;
use crate::error::AuthError;
use crate::feedback;
use crate::field::{NumberField, Switch};
use crate::help;
use crate::interval::{MAX_MINUTES, MAX_SECONDS};
use crate::key::{Binding, KeyMap};
use crate::ring;
use crate::timer::{self, CycleCompleteMsg, FrameMsg};
use crate::toast;
use crate::Component;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use once_cell::sync::OnceCell;
use std::sync::Arc;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Hands the settings to [`Model::init`]. Only the first call wins.
pub fn install(settings: Settings) -> bool {
    SETTINGS.set(settings).is_ok()
}

const DEFAULT_WIDTH: usize = 80;

pub const NOT_CONFIGURED_TITLE: &str = "Connect Supabase to enable Google Sign-In";
pub const NOT_CONFIGURED_BODY: &str =
    "Add your Supabase project URL and anon key to the config file, then this button will use Google OAuth.";

/// Focusable controls in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Minutes,
    Seconds,
    Repeat,
    StartPause,
    Reset,
    SignIn,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Minutes,
        Focus::Seconds,
        Focus::Repeat,
        Focus::StartPause,
        Focus::Reset,
        Focus::SignIn,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

/// Result of a sign-in attempt, delivered from the blocking worker.
#[derive(Debug)]
pub struct AuthResultMsg(pub Result<Session, AuthError>);

pub struct Model {
    pub timer: timer::Model,
    pub ring: ring::Model,
    pub minutes: NumberField,
    pub seconds: NumberField,
    pub repeat: Switch,
    pub keys: AppKeyMap,
    pub help: help::Model,
    pub toasts: toast::Model,
    auth: Arc<dyn AuthProvider>,
    session: Option<Session>,
    signing_in: bool,
    focus: Focus,
    width: usize,
}

impl Model {
    pub fn new(settings: &Settings) -> Self {
        let config = settings.timer_config();
        let timer = timer::with_config(config)
            .with_feedback(feedback::from_settings(&settings.feedback))
            .with_fps(settings.fps);

        let mut minutes = NumberField::new("Minutes", 0, MAX_MINUTES);
        minutes.set_value(config.minutes as i64);
        let mut seconds = NumberField::new("Seconds", 0, MAX_SECONDS);
        seconds.set_value(config.seconds as i64);
        let repeat = Switch::new("Auto-repeat", "Restart interval automatically", config.auto_repeat);

        let mut model = Self {
            timer,
            ring: ring::Model::default(),
            minutes,
            seconds,
            repeat,
            keys: AppKeyMap::default(),
            help: help::Model::new().with_width(DEFAULT_WIDTH),
            toasts: toast::Model::new(),
            auth: auth::from_settings(&settings.auth),
            session: None,
            signing_in: false,
            focus: Focus::StartPause,
            width: DEFAULT_WIDTH,
        };
        model.sync();
        model
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.timer = self.timer.with_clock(clock);
        self
    }

    pub fn with_auth(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth = provider;
        self
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn signing_in(&self) -> bool {
        self.signing_in
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.minutes.blur();
        self.seconds.blur();
        self.repeat.blur();
        match focus {
            Focus::Minutes => {
                self.minutes.focus();
            }
            Focus::Seconds => {
                self.seconds.focus();
            }
            Focus::Repeat => {
                self.repeat.focus();
            }
            Focus::StartPause | Focus::Reset | Focus::SignIn => {}
        }
        self.focus = focus;
    }

    /// Start when stopped, pause when running.
    pub fn toggle_timer(&mut self) -> Option<Cmd> {
        self.timer.toggle()
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn toggle_repeat(&mut self) -> Option<Cmd> {
        let on = self.repeat.toggle();
        self.timer.set_auto_repeat(on)
    }

    /// Kicks off Google sign-in on a blocking worker. Ignored while an
    /// attempt is in flight or once signed in.
    pub fn sign_in(&mut self) -> Option<Cmd> {
        if self.signing_in || self.session.is_some() {
            return None;
        }
        self.signing_in = true;
        tracing::info!("starting sign-in");

        let provider = Arc::clone(&self.auth);
        Some(Box::pin(async move {
            let result = match tokio::task::spawn_blocking(move || provider.sign_in()).await {
                Ok(result) => result,
                Err(e) => Err(AuthError::Callback(std::io::Error::other(e.to_string()))),
            };
            Some(Box::new(AuthResultMsg(result)) as Msg)
        }))
    }

    fn on_auth_result(&mut self, result: Result<Session, AuthError>) -> Option<Cmd> {
        self.signing_in = false;
        match result {
            Ok(session) => {
                let title = format!("Signed in as {}", session.display_name());
                self.session = Some(session);
                Some(self.toasts.success(title, None))
            }
            Err(AuthError::NotConfigured) => {
                tracing::debug!("sign-in requested without a Supabase project");
                Some(self.toasts.info(NOT_CONFIGURED_TITLE, Some(NOT_CONFIGURED_BODY.to_string())))
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign-in failed");
                Some(self.toasts.error("Sign-in failed", Some(e.to_string())))
            }
        }
    }

    fn activate(&mut self) -> Option<Cmd> {
        match self.focus {
            Focus::Minutes | Focus::Seconds => {
                self.set_focus(self.focus.next());
                None
            }
            Focus::Repeat => self.toggle_repeat(),
            Focus::StartPause => self.toggle_timer(),
            Focus::Reset => {
                self.reset_timer();
                None
            }
            Focus::SignIn => self.sign_in(),
        }
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if self.keys.quit.matches(key) {
            self.timer.cancel();
            return Some(quit());
        }
        if self.keys.next.matches(key) {
            self.set_focus(self.focus.next());
            return None;
        }
        if self.keys.prev.matches(key) {
            self.set_focus(self.focus.prev());
            return None;
        }

        // A focused field gets first pick of digits, arrows and backspace.
        if self.minutes.handle_key(key) {
            self.timer.set_minutes(self.minutes.value() as i64);
            return None;
        }
        if self.seconds.handle_key(key) {
            self.timer.set_seconds(self.seconds.value() as i64);
            return None;
        }

        if self.keys.activate.matches(key) {
            self.activate()
        } else if self.keys.toggle.matches(key) {
            self.toggle_timer()
        } else if self.keys.reset.matches(key) {
            self.reset_timer();
            None
        } else if self.keys.repeat.matches(key) {
            self.toggle_repeat()
        } else if self.keys.sign_in.matches(key) {
            self.sign_in()
        } else if self.keys.help.matches(key) {
            self.help.show_all = !self.help.show_all;
            None
        } else {
            None
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Option<Cmd> {
        if msg.is::<FrameMsg>() {
            return self.timer.update(msg);
        }
        if let Some(done) = msg.downcast_ref::<CycleCompleteMsg>() {
            if done.id == self.timer.id() && !done.repeating {
                tracing::debug!(cycles = done.cycles, "timer stopped after cycle");
            }
            return None;
        }
        if msg.is::<toast::ExpireMsg>() {
            return self.toasts.update(&msg);
        }
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = size.width as usize;
            self.help.width = self.width;
            return None;
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }
        match msg.downcast::<AuthResultMsg>() {
            Ok(result) => self.on_auth_result(result.0),
            Err(_) => None,
        }
    }

    /// Keeps help text and binding state in line with the model.
    fn sync(&mut self) {
        self.keys
            .toggle
            .set_desc(if self.timer.running() { "pause" } else { "start" });
        self.keys
            .help
            .set_desc(if self.help.show_all { "less" } else { "more" });
        self.keys
            .sign_in
            .set_enabled(self.session.is_none() && !self.signing_in);
    }
}

impl KeyMap for Model {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.keys.toggle,
            &self.keys.reset,
            &self.keys.repeat,
            &self.keys.sign_in,
            &self.keys.next,
            &self.keys.help,
            &self.keys.quit,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        let field = &self.minutes.key_map;
        vec![
            vec![&self.keys.toggle, &self.keys.reset, &self.keys.repeat],
            vec![&self.keys.next, &self.keys.prev, &self.keys.activate],
            vec![&field.increment, &field.decrement, &field.delete],
            vec![&self.keys.sign_in, &self.keys.help, &self.keys.quit],
        ]
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let settings = SETTINGS.get().cloned().unwrap_or_default();
        (Model::new(&settings), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let cmd = self.dispatch(msg);
        self.sync();
        cmd
    }

    fn view(&self) -> String {
        self.render()
    }
}
