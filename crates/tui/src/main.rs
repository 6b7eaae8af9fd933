mod app;
mod glyphs;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use passcode_core::{
    config::{self, AppConfig},
    sheet::SheetLoader,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    tracing::info!(path = %config::config_path().display(), source = %config.source(), "Configuration loaded");

    let loader = SheetLoader::new(config.source());
    let mut app = app::PasscodeApp::new(config, loader);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("passcode.log");

    let env_filter = EnvFilter::from_default_env();

    // Stdout is owned by the alternate screen, so only the file layer is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
