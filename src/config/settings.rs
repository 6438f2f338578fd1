//! User settings
//!
//! Reads `config.toml` from the config directory. Settings cover the
//! default merge strategy, the registry used for modules without a
//! registry URL, and output preferences. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::defaults::DEFAULT_INDENT;
use crate::config::urls::DEFAULT_REGISTRY;
use crate::core::merge::{ConflictStrategy, MergeOptions};
use crate::infra::dirs::ModlockDirs;

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },

    /// Indentation would not produce valid JSON
    #[error("Invalid indent {indent:?} in config file '{path}': only spaces and tabs are allowed")]
    InvalidIndent { path: String, indent: String },
}

/// All user settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Merge defaults
    #[serde(default)]
    pub merge: MergeSettings,

    /// Registry settings
    #[serde(default)]
    pub registry: RegistrySettings,

    /// Output preferences
    #[serde(default)]
    pub output: OutputSettings,
}

/// Merge defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Conflict strategy used when none is given on the command line
    pub strategy: Option<ConflictStrategy>,

    /// Advisory hash verification toggle
    pub verify_hashes: Option<bool>,
}

/// Registry settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Registry for modules without a registry URL
    pub default_url: Option<String>,
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Indentation for written lockfiles (spaces and tabs only)
    pub indent: Option<String>,

    /// Emit JSON instead of text
    pub json: Option<bool>,
}

impl Settings {
    /// Load settings from the config directory
    pub fn load(dirs: &ModlockDirs) -> Result<Self, SettingsError> {
        Self::load_from_path(&dirs.settings_path())
    }

    /// Load settings from a specific path
    ///
    /// Returns defaults if the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        settings.validate(path)?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(indent) = &self.output.indent {
            if !indent.chars().all(|c| c == ' ' || c == '\t') {
                return Err(SettingsError::InvalidIndent {
                    path: path.display().to_string(),
                    indent: indent.clone(),
                });
            }
        }
        Ok(())
    }

    /// Effective merge options, with an optional override for the strategy
    #[must_use]
    pub fn merge_options(&self, strategy: Option<ConflictStrategy>) -> MergeOptions {
        let defaults = MergeOptions::default();
        MergeOptions {
            strategy: strategy
                .or(self.merge.strategy)
                .unwrap_or(defaults.strategy),
            verify_hashes: self.merge.verify_hashes.unwrap_or(defaults.verify_hashes),
        }
    }

    /// Effective default registry URL
    #[must_use]
    pub fn default_registry(&self) -> &str {
        self.registry
            .default_url
            .as_deref()
            .unwrap_or(DEFAULT_REGISTRY)
    }

    /// Effective lockfile indentation
    #[must_use]
    pub fn indent(&self) -> &str {
        self.output.indent.as_deref().unwrap_or(DEFAULT_INDENT)
    }

    /// Whether JSON output is preferred
    #[must_use]
    pub fn json_output(&self) -> bool {
        self.output.json.unwrap_or(false)
    }
}
