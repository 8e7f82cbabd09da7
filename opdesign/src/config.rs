//! Design configuration
//!
//! Values are kept as engineering-notation strings exactly as a user would
//! type them; the formula engine parses them when it needs numbers. A JSON
//! file only has to name the keys it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::normalize::{Language, NormalizerKind};
use crate::matcher::DEFAULT_LOW_CONFIDENCE_THRESHOLD;
use crate::units::ParsePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub default_resistor: String,
    pub default_capacitor: String,
    pub default_voltage: String,
    pub default_gain: String,
    pub default_cutoff: String,
    pub default_time_constant: String,
    /// Schmitt trigger upper threshold offered when the user gives none.
    pub default_upper_threshold: String,
    pub output_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub low_confidence_threshold: f64,
    pub parse_policy: ParsePolicy,
    pub language: Language,
    pub normalizer: NormalizerKind,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            default_resistor: "10k".to_string(),
            default_capacitor: "1u".to_string(),
            default_voltage: "15".to_string(),
            default_gain: "10".to_string(),
            default_cutoff: "1000".to_string(),
            default_time_constant: "1ms".to_string(),
            default_upper_threshold: "5".to_string(),
            output_dir: PathBuf::from("circuit_outputs"),
            templates_dir: PathBuf::from("latex_codes"),
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            parse_policy: ParsePolicy::Strict,
            language: Language::En,
            normalizer: NormalizerKind::Lemmatizing,
        }
    }
}

impl DesignConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read `path`, merging its keys over the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Like [`DesignConfig::load`], but a missing file yields the defaults.
    /// A file that exists and does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }
}
