//! File logging.
//!
//! The terminal belongs to the UI, so logs go to
//! `<config dir>/interval-habit/interval-habit.log` only. `RUST_LOG` takes
//! precedence; otherwise the level is `info`, or `debug` for this crate when
//! `DEBUG_LOGGING` is set.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "interval-habit.log";

/// Default log directory, if the platform has a config directory.
pub fn default_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(crate::config::APP_NAME))
}

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,interval_habit=debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber writing to `dir`.
///
/// The returned guard flushes buffered lines on drop and must be held for
/// the life of the program. Returns `None`, with logging disabled, when the
/// directory cannot be created.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        // No subscriber yet, and stdout is about to be taken over.
        eprintln!("Failed to create log directory {:?}: {}, logging disabled", dir, e);
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug_logging)));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .try_init();
    if installed.is_err() {
        return None;
    }

    tracing::info!(log_file = ?dir.join(LOG_FILE), debug_logging, "logging initialized");
    Some(guard)
}
