//! Application configuration stored under the user's config directory.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::info;

use crate::store::DEFAULT_DATA_FILE;

/// Directory under `~/.config` holding the configuration file.
pub const CONFIG_DIR: &str = "hotel";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_HOTEL_NAME: &str = "Hotel Refúgio dos Sonhos";
const DEFAULT_TICK_RATE_MS: u64 = 250;

const DEFAULT_CONFIG: &str = r#"# Hotel manager configuration

# JSON file holding clients, rooms and reservations.
# Relative paths are resolved against the working directory.
data_file = "dados.json"

# Name shown in the title bar.
hotel_name = "Hotel Refúgio dos Sonhos"

# Input poll interval in milliseconds.
tick_rate_ms = 250
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the data file.
    pub data_file: PathBuf,
    /// Name shown in the title bar.
    pub hotel_name: String,
    /// Input poll interval in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            hotel_name: DEFAULT_HOTEL_NAME.to_string(),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl AppConfig {
    /// Load the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load the configuration from `path`, falling back to defaults for
    /// anything missing (including the file itself).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Poll interval for terminal input.
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

/// Location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}
