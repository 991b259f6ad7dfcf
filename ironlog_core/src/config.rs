//! Configuration file support for Ironlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/ironlog/config.toml`.

use crate::finalize::{FinalizeOptions, PrMatch};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub records: RecordsConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub rest: RestConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Personal record detection configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RecordsConfig {
    /// When set, sets within this many kilograms of the session best count
    /// as tied for the best. Absent means exact matching.
    #[serde(default)]
    pub pr_tolerance_kg: Option<f64>,
}

/// Session finalization configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Report a zero duration when the clock went backwards during a session
    #[serde(default = "default_clamp_negative_duration")]
    pub clamp_negative_duration: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            clamp_negative_duration: default_clamp_negative_duration(),
        }
    }
}

/// Rest timer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_rest_seconds")]
    pub default_seconds: u32,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            default_seconds: default_rest_seconds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("ironlog")
}

fn default_clamp_negative_duration() -> bool {
    true
}

fn default_rest_seconds() -> u32 {
    90
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
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
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("ironlog").join("config.toml")
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

    fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self.records.pr_tolerance_kg {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(Error::Config(format!(
                    "records.pr_tolerance_kg must be a non-negative number, got {}",
                    tolerance
                )));
            }
        }
        Ok(())
    }

    /// Finalizer options derived from this configuration
    pub fn finalize_options(&self) -> FinalizeOptions {
        FinalizeOptions {
            pr_match: match self.records.pr_tolerance_kg {
                Some(epsilon) => PrMatch::Within(epsilon),
                None => PrMatch::Exact,
            },
            clamp_negative_duration: self.session.clamp_negative_duration,
        }
    }
}
