use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::PlaybackRate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub mini_player: MiniPlayerConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_volume")]
    pub default_volume: f64,

    /// Stored as the menu label form ("Normal", "1.5x", ...).
    #[serde(default = "default_rate")]
    pub default_rate: String,

    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,
}

impl PlaybackConfig {
    /// Resolve the stored label, falling back to normal speed when the
    /// file carries an unrecognized value.
    pub fn rate(&self) -> PlaybackRate {
        PlaybackRate::from_label(&self.default_rate).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiniPlayerConfig {
    #[serde(default = "default_mini_width")]
    pub width: f64,

    #[serde(default = "default_mini_height")]
    pub height: f64,

    #[serde(default = "default_corner_margin")]
    pub corner_margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load from an explicit path, for embedders that manage their own
    /// config location. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        info!("Config loaded successfully");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("vitrine").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            mini_player: MiniPlayerConfig::default(),
            probe: ProbeConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            default_rate: default_rate(),
            seek_step_secs: default_seek_step(),
        }
    }
}

impl Default for MiniPlayerConfig {
    fn default() -> Self {
        Self {
            width: default_mini_width(),
            height: default_mini_height(),
            corner_margin: default_corner_margin(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            bus_capacity: default_bus_capacity(),
        }
    }
}

// Default value functions
fn default_volume() -> f64 { 1.0 }
fn default_rate() -> String { "Normal".to_string() }
fn default_seek_step() -> f64 { crate::constants::SEEK_STEP_SECS }
fn default_mini_width() -> f64 { 320.0 }
fn default_mini_height() -> f64 { 180.0 }
fn default_corner_margin() -> f64 { crate::constants::MINI_CORNER_MARGIN }
fn default_probe_timeout() -> u64 { 5 }
fn default_cache_capacity() -> usize { 256 }
fn default_bus_capacity() -> usize { 256 }
