//! # interval-habit
//!
//! A repeating interval timer for habit routines, in the terminal.
//!
//! Set minutes and seconds for one round and let it loop until you stop it:
//! brushing teeth, stretching, pomodoros. Every completed round pings you
//! (terminal bell, a short tone, optionally a desktop notification) and the
//! cycle counter goes up.
//!
//! The crate is split the way a bubbletea application usually is:
//!
//! - [`interval`] is the pure state machine: configuration, deadline,
//!   cycles. No I/O, time is passed in.
//! - [`timer`] drives it from a frame loop of tick commands and fires
//!   [`feedback`] when a cycle completes.
//! - [`ring`], [`field`], [`toast`] and [`help`] are the widgets the page
//!   is built from; [`app`] composes them into the page.
//! - [`auth`] implements "Continue with Google" against a Supabase project.
//! - [`config`], [`logging`] and [`error`] are the ambient plumbing.
//!
//! ## Focus Management
//!
//! Focusable widgets implement [`Component`]:
//!
//! ```rust
//! use interval_habit::prelude::*;
//!
//! fn handle_focus<T: Component>(component: &mut T) {
//!     let _cmd = component.focus();
//!     assert!(component.focused());
//!     component.blur();
//!     assert!(!component.focused());
//! }
//!
//! let mut minutes = NumberField::new("Minutes", 0, 180);
//! handle_focus(&mut minutes);
//! ```

pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod feedback;
pub mod field;
pub mod help;
pub mod interval;
pub mod key;
pub mod logging;
pub mod ring;
pub mod timer;
pub mod toast;

use bubbletea_rs::Cmd;

/// Core trait for widgets that take keyboard focus.
///
/// - `focus()` sets the focused state and may return a command to run on
///   focus.
/// - `blur()` clears it.
/// - `focused()` reports it.
///
/// ```rust
/// use interval_habit::prelude::*;
///
/// let mut repeat = Switch::new("Auto-repeat", "Restart interval automatically", true);
/// assert!(!repeat.focused());
/// repeat.focus();
/// assert!(repeat.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use app::Model as App;
pub use error::{AuthError, ConfigError, Error, Result};
pub use field::{NumberField, Switch};
pub use help::Model as HelpModel;
pub use interval::{Config, Frame, IntervalTimer};
pub use key::{Binding, KeyMap, KeyPress};
pub use ring::Model as Ring;
pub use timer::{CycleCompleteMsg, FrameMsg, Model as Timer};
pub use toast::Model as Toasts;

/// Common imports for building on the widgets.
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::field::{NumberField, Switch};
    pub use crate::help::Model as HelpModel;
    pub use crate::interval::{Config, Frame, IntervalTimer};
    pub use crate::key::{Binding, KeyMap, KeyPress};
    pub use crate::ring::Model as Ring;
    pub use crate::timer::{CycleCompleteMsg, FrameMsg, Model as Timer};
    pub use crate::toast::{Kind as ToastKind, Model as Toasts};
    pub use crate::Component;
}
