mod app;
mod widgets;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use hotel_core::{
    config::{self, AppConfig},
    HotelStore, LoadError,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    info!(data_file = %config.data_file.display(), "Starting hotel manager");

    let (store, load_error) = HotelStore::open(config.data_file.clone());
    let status = match load_error {
        None => format!(
            "Loaded {} clients, {} rooms, {} reservations",
            store.clients().len(),
            store.rooms().len(),
            store.reservations().len()
        ),
        Some(LoadError::FileMissing { .. }) => "No data file yet, starting empty".to_string(),
        Some(err) => format!("Could not load data, starting empty: {err}"),
    };

    let mut app = app::HotelApp::new(store, config, status);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("hotel.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the terminal UI, so only the file layer is installed.
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
