//! Configuration file support for unitconv.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/unitconv/config.toml`.

use crate::engine::{ConversionEngine, TemperatureMode};
use crate::history::{HistoryLog, DEFAULT_EXPORT_FILE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomUnit>,
}

/// History export configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,

    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            export_path: default_export_path(),
            precision: default_precision(),
        }
    }
}

/// Conversion behaviour configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ConversionConfig {
    #[serde(default)]
    pub temperature_mode: TemperatureMode,
}

/// Custom conversion registered at startup: `1 from = factor to`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomUnit {
    pub from: String,
    pub to: String,
    pub factor: f64,
}

// Default value functions
fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_FILE)
}

fn default_precision() -> usize {
    2
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME")
                    .map_err(|_| Error::Config("HOME environment variable not set".into()))?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join("unitconv").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Build an engine with the configured temperature mode and custom units
    pub fn build_engine(&self) -> Result<ConversionEngine> {
        let mut engine =
            ConversionEngine::new().with_temperature_mode(self.conversion.temperature_mode);

        for custom in &self.custom {
            engine
                .register_custom_unit(&custom.from, &custom.to, custom.factor)
                .map_err(|e| {
                    Error::Config(format!(
                        "Invalid custom unit '{}' -> '{}': {}",
                        custom.from, custom.to, e
                    ))
                })?;
        }

        Ok(engine)
    }

    /// Build an empty history log using the configured export precision
    pub fn build_history(&self) -> HistoryLog {
        HistoryLog::with_precision(self.history.precision)
    }
}
