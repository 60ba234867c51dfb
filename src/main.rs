//! Gesture Runner
//!
//! Jump over obstacles by bobbing your head. The terminal is the screen, so
//! logs go to a file.

use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gesture_runner::{Config, VERSION, app};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(&config).context("invalid RUNNER_LOG")?;

    info!("Gesture Runner v{}", VERSION);
    info!(
        tick_hz = config.tick_hz,
        camera = ?config.camera,
        muted = config.muted,
        practice = config.invulnerable,
        "configuration loaded"
    );

    app::run(config)
}

/// Initialize tracing/logging into the configured log file.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(&config.log_level)?;

    let (writer, file_error) = match File::create(&config.log_file) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
        Err(e) => (BoxMakeWriter::new(std::io::sink), Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    // Logs are going nowhere; say so before the game takes the screen.
    if let Some(e) = file_error {
        eprintln!("cannot open log file {}: {}", config.log_file.display(), e);
    }
    Ok(())
}
