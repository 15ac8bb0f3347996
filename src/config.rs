//! Configuration module
//!
//! Read from a TOML file (default `~/.config/chargehub/config.toml`, or the
//! path in `CHARGEHUB_CONFIG`). Every section has defaults, so an empty or
//! partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::CostRounding;
use crate::shared::errors::ConfigError;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "CHARGEHUB_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `chargehub=debug`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Fractional digits of billed amounts
    pub cost_scale: u32,
    /// Fractional digits kept for booked hours before multiplying
    pub hours_scale: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        let rounding = CostRounding::default();
        Self {
            cost_scale: rounding.cost_scale,
            hours_scale: rounding.hours_scale,
        }
    }
}

impl BookingConfig {
    pub fn cost_rounding(&self) -> CostRounding {
        CostRounding {
            hours_scale: self.hours_scale,
            cost_scale: self.cost_scale,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load from `CHARGEHUB_CONFIG` or the default path, falling back to
    /// defaults when the file does not exist.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());
        match Self::load(&path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chargehub")
        .join("config.toml")
}
