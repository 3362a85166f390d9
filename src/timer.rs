//! Interval timer component for bubbletea-rs.
//!
//! Wraps the [`IntervalTimer`](crate::interval::IntervalTimer) state machine
//! in a frame loop. While running, the component keeps one chain of
//! [`FrameMsg`] ticks alive; each frame re-reads the clock and re-checks the
//! deadline. Every component has a unique `id`, and every loop carries a
//! generation `tag`: stopping, resetting or re-arming bumps the tag, so frames
//! from a superseded loop are dropped instead of driving a stale deadline.
//!
//! # Usage
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use interval_habit::timer::{self, CycleCompleteMsg, Model};
//!
//! struct App {
//!     timer: Model,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = timer::new(0, 30, true);
//!         let cmd = timer.start();
//!         (Self { timer }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(done) = msg.downcast_ref::<CycleCompleteMsg>() {
//!             if done.id == self.timer.id() {
//!                 // One more round finished.
//!             }
//!         }
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("{}  cycles: {}", self.timer.view(), self.timer.cycles())
//!     }
//! }
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::DEFAULT_FPS;
use crate::feedback::{Feedback, Silent};
use crate::interval::{Config, Frame, IntervalTimer};
use bubbletea_rs::{batch, tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Frame length for a frame rate, never zero.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / fps.max(1) as u64)
}

/// One tick of a timer's frame loop.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    pub id: i64,
    tag: i64,
}

/// Sent after a cycle completes, once feedback has been fired.
#[derive(Debug, Clone)]
pub struct CycleCompleteMsg {
    pub id: i64,
    /// Completed cycles since the last reset.
    pub cycles: u64,
    /// Whether the next cycle started automatically.
    pub repeating: bool,
}

#[derive(Clone)]
pub struct Model {
    timer: IntervalTimer,
    clock: Arc<dyn Clock>,
    feedback: Arc<dyn Feedback>,
    /// Delay between frames while running.
    pub interval: Duration,
    id: i64,
    tag: i64,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("timer", &self.timer)
            .field("interval", &self.interval)
            .field("id", &self.id)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Creates a stopped timer on the system clock with no feedback.
pub fn new(minutes: i64, seconds: i64, auto_repeat: bool) -> Model {
    with_config(Config::new(minutes, seconds, auto_repeat))
}

pub fn with_config(config: Config) -> Model {
    Model {
        timer: IntervalTimer::with_config(config),
        clock: Arc::new(SystemClock),
        feedback: Arc::new(Silent),
        interval: frame_interval(DEFAULT_FPS),
        id: next_id(),
        tag: 0,
    }
}

impl Model {
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.interval = frame_interval(fps);
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// The underlying state machine, read-only.
    pub fn state(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn cycles(&self) -> u64 {
        self.timer.cycles()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.timer.remaining_ms()
    }

    pub fn duration_ms(&self) -> u64 {
        self.timer.duration_ms()
    }

    pub fn progress(&self) -> f64 {
        self.timer.progress()
    }

    /// Starts a fresh cycle and returns the first frame. `None` if the timer
    /// was already running.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.timer.is_running() {
            return None;
        }
        self.timer.start(self.clock.now());
        self.tag += 1;
        tracing::debug!(id = self.id, duration_ms = self.timer.duration_ms(), "timer started");
        Some(self.frame())
    }

    pub fn pause(&mut self) {
        if !self.timer.is_running() {
            return;
        }
        self.timer.pause();
        self.tag += 1;
        tracing::debug!(id = self.id, remaining_ms = self.timer.remaining_ms(), "timer paused");
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.tag += 1;
        tracing::debug!(id = self.id, "timer reset");
    }

    /// Starts when stopped, pauses when running.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if self.timer.is_running() {
            self.pause();
            None
        } else {
            self.start()
        }
    }

    pub fn set_minutes(&mut self, raw: i64) {
        self.timer.set_minutes(raw);
    }

    pub fn set_seconds(&mut self, raw: i64) {
        self.timer.set_seconds(raw);
    }

    /// Changes auto-repeat. A running loop is replaced by a fresh one so the
    /// next frame already sees the new setting; the deadline is kept.
    pub fn set_auto_repeat(&mut self, auto_repeat: bool) -> Option<Cmd> {
        if self.timer.auto_repeat() == auto_repeat {
            return None;
        }
        self.timer.set_auto_repeat(auto_repeat);
        if !self.timer.is_running() {
            return None;
        }
        self.tag += 1;
        Some(self.frame())
    }

    /// Stops the frame loop for good, e.g. before the program exits.
    pub fn cancel(&mut self) {
        self.tag += 1;
    }

    fn frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    fn completed(&self, cycles: u64, repeating: bool) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(CycleCompleteMsg {
                id,
                cycles,
                repeating,
            }) as Msg
        })
    }

    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let frame_msg = msg.downcast_ref::<FrameMsg>()?;
        if frame_msg.id != self.id || frame_msg.tag != self.tag {
            return None;
        }

        match self.timer.advance(self.clock.now()) {
            Frame::Idle => None,
            Frame::Ticking { .. } => Some(self.frame()),
            Frame::CycleCompleted { cycles, repeating } => {
                tracing::info!(id = self.id, cycles, repeating, "interval complete");
                self.feedback.pulse();
                let done = self.completed(cycles, repeating);
                if repeating {
                    Some(batch(vec![self.frame(), done]))
                } else {
                    Some(done)
                }
            }
        }
    }

    /// The countdown as `MM:SS`.
    pub fn view(&self) -> String {
        self.timer.display()
    }

    /// A frame message for the live loop, as the runtime would deliver it.
    #[cfg(test)]
    pub(crate) fn live_frame(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.tag,
        }
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        with_config(Config::default())
    }
}
