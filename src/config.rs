//! Configuration system for Eradia
//!
//! Loads configuration from TOML file at `~/.config/eradia/config.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub persistence: PersistenceConfig,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            // Auto-generate default config file
            if let Err(e) = Self::save_default(config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("eradia");

        Ok(config_dir.join("config.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let default_config = Self::default();
        let toml_string = toml::to_string_pretty(&default_config)
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string)
            .context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eradia")
}

/// Where journal entries and the open-window map live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the `<year>/<month>/<day>-<n>` entry tree
    pub journal_dir: PathBuf,
    /// JSON document holding `openWindows`
    pub config_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = data_dir();
        Self {
            journal_dir: root.join("journal"),
            config_file: root.join("config.json"),
        }
    }
}

/// Debounce and retry timings for background saves
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Trailing debounce for the open-window map (ms)
    pub config_debounce_ms: u64,
    /// Trailing debounce for entry content, per document (ms)
    pub entry_debounce_ms: u64,
    /// Verified-write attempts before giving up
    pub write_retries: u32,
    /// Pause between write attempts (ms)
    pub retry_delay_ms: u64,
}

impl PersistenceConfig {
    pub fn config_debounce(&self) -> Duration {
        Duration::from_millis(self.config_debounce_ms)
    }

    pub fn entry_debounce(&self) -> Duration {
        Duration::from_millis(self.entry_debounce_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            config_debounce_ms: 1000,
            entry_debounce_ms: 500,
            write_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

/// Window geometry constants used by the window manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Nominal size of a new or cascaded window
    pub default_width: f64,
    pub default_height: f64,
    /// Fraction of the viewport a new window may take on small screens
    pub viewport_scale: f64,
    /// Diagonal offset of the first window
    pub offset_base: f64,
    /// Extra offset per already-open window
    pub offset_step: f64,
    /// Offsets stop growing here so windows never march off-screen
    pub offset_cap: f64,
    /// Z-index assumed when no window exists yet
    pub base_z_index: i64,
    pub min_width: f64,
    pub min_height: f64,
    /// Minimized icon footprint
    pub icon_width: f64,
    pub icon_height: f64,
    pub icon_margin: f64,
    pub cascade_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_width: 589.0,
            default_height: 442.0,
            viewport_scale: 0.589,
            offset_base: 20.0,
            offset_step: 30.0,
            offset_cap: 200.0,
            base_z_index: 999,
            min_width: 200.0,
            min_height: 100.0,
            icon_width: 160.0,
            icon_height: 32.0,
            icon_margin: 8.0,
            cascade_offset: 32.0,
        }
    }
}

/// Viewport used by the command-line front end, which has no real container to measure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}
