//! Settings file and command-line overrides.
//!
//! Settings live in a TOML file managed by `confy`
//! (`~/.config/interval-habit/interval-habit.toml` on Linux). A missing file
//! is created with defaults. Command-line flags override the file for one
//! run and are never written back.

use crate::error::ConfigError;
use crate::interval::{clamp_minutes, clamp_seconds, Config};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "interval-habit";

pub const DEFAULT_FPS: u32 = 60;
const MAX_FPS: u32 = 120;

/// Port the browser is redirected to after Google sign-in.
pub const DEFAULT_REDIRECT_PORT: u16 = 8086;
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    /// Ring the terminal bell on every completed cycle.
    pub bell: bool,
    /// Play a short tone on every completed cycle.
    pub tone: bool,
    /// Post a desktop notification on every completed cycle.
    pub notification: bool,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            bell: true,
            tone: true,
            notification: false,
        }
    }
}

/// Supabase project used for "Continue with Google". Sign-in stays a
/// placeholder until both `supabase_url` and `anon_key` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    pub redirect_port: u16,
    pub timeout_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            anon_key: None,
            redirect_port: DEFAULT_REDIRECT_PORT,
            timeout_secs: DEFAULT_AUTH_TIMEOUT_SECS,
        }
    }
}

impl AuthSettings {
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.supabase_url) && set(&self.anon_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default minutes per cycle.
    pub minutes: u32,
    /// Default seconds per cycle.
    pub seconds: u32,
    /// Start the next cycle automatically.
    pub auto_repeat: bool,
    /// Frames per second of the countdown loop.
    pub fps: u32,
    pub feedback: FeedbackSettings,
    pub auth: AuthSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let timer = Config::default();
        Self {
            minutes: timer.minutes,
            seconds: timer.seconds,
            auto_repeat: timer.auto_repeat,
            fps: DEFAULT_FPS,
            feedback: FeedbackSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `None`.
    /// Returns the settings and the file they came from.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_path()?,
        };
        let settings: Settings = confy::load_path(&path).map_err(|source| ConfigError::Load {
            path: path.clone(),
            source,
        })?;
        Ok((settings.normalized(), path))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamps every field into its accepted range; hand-edited files may
    /// hold anything.
    pub fn normalized(mut self) -> Self {
        self.minutes = clamp_minutes(self.minutes as i64);
        self.seconds = clamp_seconds(self.seconds as i64);
        self.fps = self.fps.clamp(1, MAX_FPS);
        self
    }

    /// Applies one run's command-line overrides.
    pub fn apply(mut self, cli: &Cli) -> Self {
        if let Some(m) = cli.minutes {
            self.minutes = clamp_minutes(m);
        }
        if let Some(s) = cli.seconds {
            self.seconds = clamp_seconds(s);
        }
        if cli.repeat {
            self.auto_repeat = true;
        }
        if cli.no_repeat {
            self.auto_repeat = false;
        }
        if let Some(fps) = cli.fps {
            self.fps = fps;
        }
        if cli.silent {
            self.feedback = FeedbackSettings {
                bell: false,
                tone: false,
                notification: false,
            };
        }
        self.normalized()
    }

    /// Initial timer configuration.
    pub fn timer_config(&self) -> Config {
        Config::new(self.minutes as i64, self.seconds as i64, self.auto_repeat)
    }
}

/// Default settings file location.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    confy::get_configuration_file_path(APP_NAME, None).map_err(ConfigError::Locate)
}

/// A repeating interval timer for habit routines.
#[derive(Debug, Default, Parser)]
#[command(name = "interval-habit", version, about)]
pub struct Cli {
    /// Minutes per cycle (0-180)
    #[arg(short, long, allow_negative_numbers = true)]
    pub minutes: Option<i64>,

    /// Seconds per cycle (0-59)
    #[arg(short, long, allow_negative_numbers = true)]
    pub seconds: Option<i64>,

    /// Restart the interval automatically after each cycle
    #[arg(long, conflicts_with = "no_repeat")]
    pub repeat: bool,

    /// Stop after a single cycle
    #[arg(long)]
    pub no_repeat: bool,

    /// Disable bell, tone and notifications
    #[arg(long)]
    pub silent: bool,

    /// Countdown frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Use this settings file instead of the default one
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("interval-habit-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_defaults_match_page_defaults() {
        let s = Settings::default();
        assert_eq!(s.minutes, 2);
        assert_eq!(s.seconds, 0);
        assert!(s.auto_repeat);
        assert_eq!(s.fps, DEFAULT_FPS);
        assert!(!s.auth.is_configured());
        assert_eq!(s.timer_config().duration_ms(), 120_000);
    }

    #[test]
    fn test_cli_overrides_and_clamps() {
        let cli = Cli::parse_from(["interval-habit", "-m", "500", "-s", "-4", "--no-repeat", "--silent"]);
        let s = Settings::default().apply(&cli);
        assert_eq!(s.minutes, 180);
        assert_eq!(s.seconds, 0);
        assert!(!s.auto_repeat);
        assert!(!s.feedback.bell && !s.feedback.tone && !s.feedback.notification);
    }

    #[test]
    fn test_repeat_flags_conflict() {
        let res = Cli::try_parse_from(["interval-habit", "--repeat", "--no-repeat"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_fps_is_bounded() {
        let cli = Cli::parse_from(["interval-habit", "--fps", "0"]);
        assert_eq!(Settings::default().apply(&cli).fps, 1);

        let cli = Cli::parse_from(["interval-habit", "--fps", "1000"]);
        assert_eq!(Settings::default().apply(&cli).fps, MAX_FPS);
    }

    #[test]
    fn test_auth_needs_both_fields() {
        let mut auth = AuthSettings {
            supabase_url: Some("https://demo.supabase.co".to_string()),
            ..AuthSettings::default()
        };
        assert!(!auth.is_configured());
        auth.anon_key = Some("   ".to_string());
        assert!(!auth.is_configured());
        auth.anon_key = Some("anon".to_string());
        assert!(auth.is_configured());
    }

    #[test]
    fn test_save_then_load_round_trips_through_file() {
        let path = temp_file("roundtrip");
        let mut settings = Settings::default();
        settings.minutes = 25;
        settings.feedback.notification = true;
        settings.save(&path).expect("save settings");

        let (loaded, from) = Settings::load(Some(&path)).expect("load settings");
        assert_eq!(from, path);
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let path = temp_file("partial");
        std::fs::write(&path, "minutes = 999\nseconds = 75\n").expect("write settings");

        let (loaded, _) = Settings::load(Some(&path)).expect("load settings");
        assert_eq!(loaded.minutes, 180);
        assert_eq!(loaded.seconds, 59);
        assert!(loaded.auto_repeat);
        assert_eq!(loaded.auth, AuthSettings::default());
        let _ = std::fs::remove_file(&path);
    }
}
