//! Application configuration stored under the user's config directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{matcher::WRONG_CODE_LABEL, sheet::SheetSource};

/// Directory under `~/.config` holding the configuration file.
pub const CONFIG_DIR: &str = "passcode";

/// CSV export of the passcode spreadsheet.
pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1qFPrdYf5nwRYiG-eVwNMJcrhFCcQB-10Z7Zm6Z3mBIw/export?format=csv";

const DEFAULT_CONFIG: &str = r#"# Passcode configuration.

# CSV export endpoint of the passcode spreadsheet.
sheet_url = "https://docs.google.com/spreadsheets/d/1qFPrdYf5nwRYiG-eVwNMJcrhFCcQB-10Z7Zm6Z3mBIw/export?format=csv"

# Read the sheet from a local CSV file instead of sheet_url.
# sheet_path = "/path/to/sheet.csv"

# Title shown above fallback videos.
wrong_code_label = "Oops! Wrong code"

# Fixed seed for reproducible pickers and fallback draws.
# seed = 1234
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// CSV export endpoint.
    pub sheet_url: String,
    /// Local CSV file taking precedence over `sheet_url`.
    #[serde(default)]
    pub sheet_path: Option<PathBuf>,
    /// Title for fallback results.
    pub wrong_code_label: String,
    /// RNG seed; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            sheet_path: None,
            wrong_code_label: WRONG_CODE_LABEL.to_string(),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path`, falling back to defaults for anything missing.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("sheet_url", DEFAULT_SHEET_URL)?
            .set_default("wrong_code_label", WRONG_CODE_LABEL)?
            .add_source(File::from(path).required(false))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Where the sheet should be read from.
    pub fn source(&self) -> SheetSource {
        match &self.sheet_path {
            Some(path) => SheetSource::File(path.clone()),
            None => SheetSource::Url(self.sheet_url.clone()),
        }
    }
}

/// Default configuration file path.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(&config_path())
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
