use bubbletea_rs::Program;
use clap::Parser;
use interval_habit::config::{Cli, Settings};
use interval_habit::{app, logging, App, Result};
use std::error::Error as _;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("interval-habit: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (settings, path) = Settings::load(cli.config.as_deref())?;
    let settings = settings.apply(&cli);

    // Held until exit so buffered log lines are flushed.
    let _log_guard = logging::default_dir().and_then(|dir| logging::init(&dir));
    tracing::info!(
        config = ?path,
        minutes = settings.minutes,
        seconds = settings.seconds,
        auto_repeat = settings.auto_repeat,
        fps = settings.fps,
        "starting"
    );

    app::install(settings);
    let program = Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()?;
    program.run().await?;

    tracing::info!("exiting");
    Ok(())
}
