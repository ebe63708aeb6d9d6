use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Hard cap imposed by the tracking API on collection pages.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub workbook: String,
    pub database: String,
    #[serde(default = "default_ledger_sheet")]
    pub ledger_sheet: String,
    #[serde(default = "default_settings_sheet")]
    pub settings_sheet: String,
    #[serde(default = "default_api_username")]
    pub api_username: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_ledger_sheet() -> String {
    "Billable Hours".to_string()
}
fn default_settings_sheet() -> String {
    "Settings".to_string()
}
fn default_api_username() -> String {
    "apikey".to_string()
}
fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: Self::workbook_dir().to_string_lossy().to_string(),
            database: Self::database_file().to_string_lossy().to_string(),
            ledger_sheet: default_ledger_sheet(),
            settings_sheet: default_settings_sheet(),
            api_username: default_api_username(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.billsync`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".billsync")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("billsync.conf")
    }

    /// Return the full path of the SQLite audit database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("billsync.sqlite")
    }

    /// Return the default workbook directory
    pub fn workbook_dir() -> PathBuf {
        Self::config_dir().join("workbook")
    }

    /// Page size actually sent to the API.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write the configuration file unless it already exists.
    pub fn write_if_missing(&self) -> io::Result<bool> {
        let path = Self::config_file();
        if path.exists() {
            return Ok(false);
        }

        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(io::Error::other)?;
        let mut file = fs::File::create(&path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(true)
    }
}
