//! Batch configuration

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::BatchError;

/// Configuration for one batch run, usually loaded from TOML
///
/// ```toml
/// workers = 4
///
/// [cameo]
/// input_dir = "models/cameo"
/// output_dir = "cameo_output"
/// version_store = "cameo_output/cameo_versions.json"
///
/// [simulink]
/// models_dir = "simulink_models"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker-thread cap for the per-archive fan-out; `None` lets the
    /// runtime size the pool from available cores
    pub workers: Option<usize>,
    /// Requirements-side settings
    pub cameo: CameoConfig,
    /// Block-diagram-side settings
    pub simulink: SimulinkConfig,
}

/// Settings for processing requirements archives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameoConfig {
    /// Directory scanned for `.mdzip` archives
    pub input_dir: PathBuf,
    /// Directory receiving exported documents
    pub output_dir: PathBuf,
    /// Version store file for requirement artifacts
    pub version_store: PathBuf,
    /// Whether to infer hierarchy edges on the merged graph
    pub infer_hierarchy: bool,
    /// Whether to run version tracking after extraction
    pub track_versions: bool,
}

impl Default for CameoConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("cameo_output"),
            version_store: PathBuf::from("cameo_output/cameo_versions.json"),
            infer_hierarchy: true,
            track_versions: true,
        }
    }
}

/// Settings for processing block-diagram models
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulinkConfig {
    /// Directory scanned recursively for model trees and `.slxc` archives
    pub models_dir: PathBuf,
    /// Whether to run version tracking per model
    pub track_versions: bool,
}

impl Default for SimulinkConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("simulink_models"),
            track_versions: true,
        }
    }
}

impl BatchConfig {
    /// Parse a configuration document
    ///
    /// # Errors
    /// Returns [`BatchError::Config`] on malformed TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, BatchError> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    /// Returns [`BatchError`] when the file is unreadable or malformed.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| BatchError::io_error(path, e))?;
        Self::from_toml_str(&raw)
    }
}
