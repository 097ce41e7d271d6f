//! Configuration management for daylog

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{LevelMask, RotationConfig, DEFAULT_KEEP_DAYS, DEFAULT_SPLIT_DAYS};

/// Which sink log records go to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Colorized lines on stdout
    #[default]
    Console,
    /// Self-rotating log file
    File,
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Level selector: "debug", "info", "warn", "error", "fatal", "off" or "all"
    #[serde(default = "default_level")]
    pub level: String,

    /// Output sink
    #[serde(default)]
    pub sink: SinkKind,

    /// Active log file path, `~` is expanded (file sink only)
    #[serde(default = "default_file")]
    pub file: String,

    /// Days covered by one log file before it is rotated (default: 1)
    #[serde(default = "default_split_days")]
    pub split_days: u32,

    /// Days a rotated backup is kept (default: 90)
    #[serde(default = "default_keep_days")]
    pub keep_days: u32,

    /// Color console output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_level() -> String {
    "all".to_string()
}

fn default_file() -> String {
    logs_dir().join("daylog.log").to_string_lossy().into_owned()
}

fn default_split_days() -> u32 {
    DEFAULT_SPLIT_DAYS
}

fn default_keep_days() -> u32 {
    DEFAULT_KEEP_DAYS
}

fn default_color() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: default_level(),
            sink: SinkKind::default(),
            file: default_file(),
            split_days: default_split_days(),
            keep_days: default_keep_days(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or defaults if absent
    pub fn load_default() -> Result<Self> {
        Self::load(&config_file_path())
    }

    /// Load configuration from `path`, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Enabled levels; unknown names enable everything
    pub fn level_mask(&self) -> LevelMask {
        LevelMask::from_name(&self.level)
    }

    /// Rotation schedule for the file sink
    pub fn rotation(&self) -> RotationConfig {
        RotationConfig {
            split_days: self.split_days,
            keep_days: self.keep_days,
        }
    }

    /// Active log file path with `~` expanded
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.file).into_owned())
    }
}

/// Get the base configuration directory (~/.daylog)
/// Falls back to ./.daylog if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| PathBuf::from(".daylog"))
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".daylog"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the default logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}
