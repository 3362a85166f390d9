//! Cycle-completion feedback.
//!
//! Every completed cycle fires a [`Feedback::pulse`]. Outputs are strictly
//! best effort: a missing audio device, a notification daemon that is not
//! running or a closed terminal are logged at debug level and otherwise
//! ignored. `pulse` returns immediately and never panics into the caller.

use crate::config::FeedbackSettings;
use rodio::source::SineWave;
use rodio::{OutputStream, Sink, Source};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// A fire-and-forget signal that a cycle ended.
pub trait Feedback: Send + Sync {
    fn pulse(&self);
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn pulse(&self) {}
}

/// Rings the terminal bell. Most terminals turn this into a visual flash,
/// an urgency hint or a vibration on mobile clients.
///
/// The bell shares stdout with the renderer. It goes out as a single byte
/// under the stdout lock, so it can only land between two renderer writes,
/// and terminals execute a BEL even in the middle of an escape sequence
/// without disturbing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bell;

impl Bell {
    fn ring(out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(b"\x07")?;
        out.flush()
    }
}

impl Feedback for Bell {
    fn pulse(&self) {
        if let Err(err) = Bell::ring(&mut std::io::stdout().lock()) {
            tracing::debug!(error = %err, "terminal bell unavailable");
        }
    }
}

/// Posts a desktop notification.
#[derive(Debug, Clone)]
pub struct DesktopNotification {
    pub summary: String,
    pub body: String,
}

impl Default for DesktopNotification {
    fn default() -> Self {
        Self {
            summary: "Interval complete".to_string(),
            body: "Starting the next round.".to_string(),
        }
    }
}

impl DesktopNotification {
    fn show(&self) {
        let result = notify_rust::Notification::new()
            .appname("interval-habit")
            .summary(&self.summary)
            .body(&self.body)
            .timeout(notify_rust::Timeout::Milliseconds(3_000))
            .show();
        if let Err(err) = result {
            tracing::debug!(error = %err, "desktop notification unavailable");
        }
    }
}

impl Feedback for DesktopNotification {
    fn pulse(&self) {
        let notification = self.clone();
        // `show` is a synchronous D-Bus round trip.
        spawn_output("interval-notify", move || notification.show());
    }
}

/// A short sine beep with a fast attack and a linear decay.
#[derive(Debug, Clone, Copy)]
pub struct Tone {
    pub frequency: f32,
    pub length: Duration,
    pub attack: Duration,
    pub gain: f32,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency: 880.0,
            length: Duration::from_millis(220),
            attack: Duration::from_millis(10),
            gain: 0.2,
        }
    }
}

impl Tone {
    fn play(self) {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(err) => {
                tracing::debug!(error = %err, "no audio output device");
                return;
            }
        };
        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(err) => {
                tracing::debug!(error = %err, "audio sink unavailable");
                return;
            }
        };

        let mut beep = SineWave::new(self.frequency).take_duration(self.length);
        beep.set_filter_fadeout();
        sink.append(beep.fade_in(self.attack).amplify(self.gain));
        sink.sleep_until_end();
    }
}

impl Feedback for Tone {
    fn pulse(&self) {
        let tone = *self;
        // The output stream has to outlive playback, so the whole beep runs
        // on its own thread.
        spawn_output("interval-tone", move || tone.play());
    }
}

/// Runs a blocking output on a named thread so `pulse` returns at once.
/// Returns the handle, or `None` if the thread could not be started.
fn spawn_output<F>(name: &str, output: F) -> Option<std::thread::JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    match std::thread::Builder::new().name(name.to_string()).spawn(output) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::debug!(error = %err, thread = name, "could not start feedback thread");
            None
        }
    }
}

/// Runs every child output in order.
#[derive(Default)]
pub struct Composite {
    outputs: Vec<Box<dyn Feedback>>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, output: impl Feedback + 'static) -> Self {
        self.outputs.push(Box::new(output));
        self
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl Feedback for Composite {
    fn pulse(&self) {
        for output in &self.outputs {
            output.pulse();
        }
    }
}

/// Builds the feedback outputs enabled in the settings.
pub fn from_settings(settings: &FeedbackSettings) -> Arc<dyn Feedback> {
    let mut outputs = Composite::new();
    if settings.bell {
        outputs = outputs.with(Bell);
    }
    if settings.notification {
        outputs = outputs.with(DesktopNotification::default());
    }
    if settings.tone {
        outputs = outputs.with(Tone::default());
    }

    if outputs.is_empty() {
        Arc::new(Silent)
    } else {
        Arc::new(outputs)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts pulses; shared with the component under test through `Arc`.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct Counter(pub(crate) Arc<AtomicUsize>);

    impl Counter {
        pub(crate) fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Feedback for Counter {
        fn pulse(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_composite_pulses_every_output() {
        let a = Counter::default();
        let b = Counter::default();
        let all = Composite::new().with(a.clone()).with(b.clone()).with(Silent);

        all.pulse();
        all.pulse();

        assert_eq!(all.len(), 3);
        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn test_settings_with_everything_off_is_silent() {
        let settings = FeedbackSettings {
            bell: false,
            tone: false,
            notification: false,
        };
        // Silent must be callable without any device.
        from_settings(&settings).pulse();
    }

    #[test]
    fn test_bell_is_a_single_byte_write() {
        let mut out: Vec<u8> = Vec::new();
        Bell::ring(&mut out).expect("ring");
        assert_eq!(out, b"\x07");
    }

    #[test]
    fn test_blocking_outputs_do_not_block_pulse() {
        let (release, wait) = std::sync::mpsc::channel::<()>();
        let (done_tx, done) = std::sync::mpsc::channel::<()>();

        // The output blocks until released; spawning it must return first.
        let handle = spawn_output("interval-test", move || {
            let _ = wait.recv();
            let _ = done_tx.send(());
        })
        .expect("thread started");
        assert!(done.try_recv().is_err());

        release.send(()).expect("release");
        handle.join().expect("output thread");
        assert!(done.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_default_tone_matches_beep_shape() {
        let tone = Tone::default();
        assert_eq!(tone.frequency, 880.0);
        assert_eq!(tone.length, Duration::from_millis(220));
        assert!(tone.attack < tone.length);
        assert!(tone.gain > 0.0 && tone.gain <= 1.0);
    }
}
