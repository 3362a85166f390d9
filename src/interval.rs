//! Interval timer state machine.
//!
//! This module holds the time keeping for a repeating countdown and nothing
//! else: no rendering, no scheduling, no I/O. Every operation that depends on
//! time takes the current instant as a parameter, so the whole machine can be
//! driven deterministically from tests.
//!
//! The countdown is computed against an absolute deadline on every frame
//! rather than by decrementing a counter, so late or dropped frames never
//! accumulate drift.
//!
//! # Example
//!
//! ```rust
//! use interval_habit::interval::{Frame, IntervalTimer};
//! use std::time::{Duration, Instant};
//!
//! let mut timer = IntervalTimer::new(0, 5, false);
//! let t0 = Instant::now();
//!
//! timer.start(t0);
//! assert_eq!(timer.display(), "00:05");
//!
//! let frame = timer.advance(t0 + Duration::from_millis(5_000));
//! assert_eq!(frame, Frame::CycleCompleted { cycles: 1, repeating: false });
//! assert!(!timer.is_running());
//! assert_eq!(timer.display(), "00:00");
//! ```

use std::time::{Duration, Instant};

/// Largest accepted value for the minutes input.
pub const MAX_MINUTES: u32 = 180;
/// Largest accepted value for the seconds input.
pub const MAX_SECONDS: u32 = 59;
/// Floor for the derived cycle length.
pub const MIN_DURATION_MS: u64 = 1_000;

/// Clamps a raw minutes entry into `0..=180`.
pub fn clamp_minutes(raw: i64) -> u32 {
    raw.clamp(0, MAX_MINUTES as i64) as u32
}

/// Clamps a raw seconds entry into `0..=59`.
pub fn clamp_seconds(raw: i64) -> u32 {
    raw.clamp(0, MAX_SECONDS as i64) as u32
}

/// Cycle length for a configuration, never shorter than one second.
pub fn duration_ms(minutes: u32, seconds: u32) -> u64 {
    let total = (minutes as u64 * 60 + seconds as u64) * 1_000;
    total.max(MIN_DURATION_MS)
}

/// Formats milliseconds as `MM:SS`, flooring to whole seconds.
///
/// Minutes are not wrapped into hours, so three hours render as `180:00`.
pub fn format_mm_ss(ms: u64) -> String {
    let total_secs = ms / 1_000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Fraction of the cycle already elapsed, clamped to `[0, 1]`.
pub fn progress_fraction(remaining_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    let ratio = (remaining_ms as f64 / duration_ms as f64).min(1.0);
    (1.0 - ratio).clamp(0.0, 1.0)
}

/// User-editable timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Minutes per cycle, `0..=180`.
    pub minutes: u32,
    /// Seconds per cycle, `0..=59`.
    pub seconds: u32,
    /// Start the next cycle as soon as one completes.
    pub auto_repeat: bool,
}

impl Config {
    /// Builds a configuration, clamping both numeric fields.
    pub fn new(minutes: i64, seconds: i64, auto_repeat: bool) -> Self {
        Self {
            minutes: clamp_minutes(minutes),
            seconds: clamp_seconds(seconds),
            auto_repeat,
        }
    }

    /// Derived cycle length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        duration_ms(self.minutes, self.seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minutes: 2,
            seconds: 0,
            auto_repeat: true,
        }
    }
}

/// What a single frame did to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// The timer is not running; nothing changed.
    Idle,
    /// The current cycle is still counting down.
    Ticking {
        /// Milliseconds left in the cycle.
        remaining_ms: u64,
    },
    /// A cycle just ended.
    CycleCompleted {
        /// Completed cycles since the last reset, including this one.
        cycles: u64,
        /// Whether a fresh cycle was armed immediately.
        repeating: bool,
    },
}

/// Repeating countdown state.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    config: Config,
    running: bool,
    remaining_ms: u64,
    cycles: u64,
    deadline: Option<Instant>,
}

impl IntervalTimer {
    /// Creates a stopped timer. Inputs are clamped like user edits.
    pub fn new(minutes: i64, seconds: i64, auto_repeat: bool) -> Self {
        Self::with_config(Config::new(minutes, seconds, auto_repeat))
    }

    /// Creates a stopped timer from an existing configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Config::new(config.minutes as i64, config.seconds as i64, config.auto_repeat),
            running: false,
            remaining_ms: 0,
            cycles: 0,
            deadline: None,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn minutes(&self) -> u32 {
        self.config.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.config.seconds
    }

    pub fn auto_repeat(&self) -> bool {
        self.config.auto_repeat
    }

    /// Current cycle length, recomputed from the configuration.
    pub fn duration_ms(&self) -> u64 {
        self.config.duration_ms()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Absolute end of the current cycle, present only while running.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Arms a fresh full-length cycle. No-op while running.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }
        let duration = self.duration_ms();
        self.deadline = Some(now + Duration::from_millis(duration));
        self.remaining_ms = duration;
        self.running = true;
    }

    /// Freezes the countdown where it is. No-op while stopped.
    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.deadline = None;
    }

    /// Stops, zeroes the cycle count and refills the countdown with the
    /// current duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.deadline = None;
        self.cycles = 0;
        self.remaining_ms = self.duration_ms();
    }

    /// Sets minutes from raw input, clamped to `0..=180`.
    ///
    /// A running cycle keeps its deadline; the new length applies from the
    /// next start, reset or repeat.
    pub fn set_minutes(&mut self, raw: i64) {
        self.config.minutes = clamp_minutes(raw);
    }

    /// Sets seconds from raw input, clamped to `0..=59`.
    pub fn set_seconds(&mut self, raw: i64) {
        self.config.seconds = clamp_seconds(raw);
    }

    pub fn set_auto_repeat(&mut self, auto_repeat: bool) {
        self.config.auto_repeat = auto_repeat;
    }

    /// Re-checks the deadline against `now`.
    pub fn advance(&mut self, now: Instant) -> Frame {
        if !self.running {
            return Frame::Idle;
        }
        let Some(deadline) = self.deadline else {
            return Frame::Idle;
        };

        let remaining = deadline
            .checked_duration_since(now)
            .unwrap_or(Duration::ZERO);
        if !remaining.is_zero() {
            self.remaining_ms = remaining.as_millis() as u64;
            return Frame::Ticking {
                remaining_ms: self.remaining_ms,
            };
        }

        self.cycles += 1;
        if self.config.auto_repeat {
            let duration = self.duration_ms();
            self.deadline = Some(now + Duration::from_millis(duration));
            self.remaining_ms = duration;
        } else {
            self.running = false;
            self.deadline = None;
            self.remaining_ms = 0;
        }
        Frame::CycleCompleted {
            cycles: self.cycles,
            repeating: self.config.auto_repeat,
        }
    }

    /// Milliseconds the display should show.
    ///
    /// A fresh timer has nothing left to count, so it shows the configured
    /// duration instead; once a cycle has completed, zero is shown as zero.
    pub fn display_ms(&self) -> u64 {
        if self.remaining_ms == 0 && !self.running && self.cycles == 0 {
            self.duration_ms()
        } else {
            self.remaining_ms
        }
    }

    /// The countdown as `MM:SS`.
    pub fn display(&self) -> String {
        format_mm_ss(self.display_ms())
    }

    /// Fraction of the current cycle elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        progress_fraction(self.remaining_ms, self.duration_ms())
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}
