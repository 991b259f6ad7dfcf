//! User profile and preferences.
//!
//! A small key-value style document. Weights are always stored in
//! kilograms; the unit here only affects display and input.

use crate::state::{load_json, save_json};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const KG_PER_LB: f64 = 0.453_592_37;

/// Unit used to show and enter weights
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    /// Convert a canonical kilogram value into this unit
    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg / KG_PER_LB,
        }
    }

    /// Convert a value in this unit into kilograms
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        })
    }
}

impl FromStr for WeightUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            "lb" | "lbs" => Ok(WeightUnit::Lb),
            other => Err(Error::Validation(format!("unknown weight unit '{}'", other))),
        }
    }
}

/// User's persistent preferences
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    #[serde(default)]
    pub body_weight_kg: Option<f64>,
}

fn default_rest_seconds() -> u32 {
    90
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            display_name: None,
            weight_unit: WeightUnit::default(),
            rest_seconds: default_rest_seconds(),
            body_weight_kg: None,
        }
    }
}

impl UserSettings {
    /// Load settings from a file
    ///
    /// Returns default settings if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match load_json::<UserSettings>(path) {
            Ok(Some(settings)) => {
                tracing::debug!("Loaded settings from {:?}", path);
                Ok(settings)
            }
            Ok(None) => {
                tracing::info!("No settings file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read settings file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save settings atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(path, self)?;
        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Load settings, modify them, and save them back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserSettings) -> Result<()>,
    {
        let mut settings = Self::load(path)?;
        f(&mut settings)?;
        settings.save(path)?;
        Ok(settings)
    }

    /// Format a canonical kilogram value in the preferred unit
    pub fn format_weight(&self, kg: f64) -> String {
        let value = self.weight_unit.from_kg(kg);
        // Trim trailing zeros: 100 kg, 102.5 kg, 225.4 lb
        let rounded = (value * 10.0).round() / 10.0;
        format!("{} {}", rounded, self.weight_unit)
    }
}
