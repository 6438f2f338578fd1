//! Platform-specific directory management
//!
//! Locates the configuration directory holding `config.toml`.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! The `MODLOCK_CONFIG_DIR` environment variable overrides the default.

use std::env;
use std::path::PathBuf;

use crate::config::defaults::SETTINGS_FILE_NAME;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "MODLOCK_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "modlock";

/// Platform-specific directory provider
#[derive(Debug, Clone)]
pub struct ModlockDirs {
    config_dir: PathBuf,
}

impl ModlockDirs {
    /// Create a new `ModlockDirs` instance
    ///
    /// Checks the environment variable first, then falls back to the platform default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/modlock` or `~/.config/modlock`
    /// - macOS: `~/Library/Application Support/modlock`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path to `config.toml` in the config directory
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for ModlockDirs {
    fn default() -> Self {
        Self::new()
    }
}
