//! Module keys
//!
//! A module key identifies one version of a module as `name@version`.
//! The version part is never empty in text form: an empty version is
//! written as the `_` sentinel so the separator is always followed by
//! something parseable.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel written in place of an empty version
pub const EMPTY_VERSION_SENTINEL: &str = "_";

/// Errors produced when parsing a module key
#[derive(Error, Debug, PartialEq)]
pub enum ModuleKeyError {
    /// No `@` separator in the text
    #[error("Invalid module key '{key}': expected 'name@version'")]
    MissingSeparator { key: String },

    /// Name part is empty
    #[error("Invalid module key '{key}': module name is empty")]
    EmptyName { key: String },
}

/// A `{name, version}` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleKey {
    /// Module name
    pub name: String,
    /// Module version, empty for non-registry overrides
    pub version: String,
}

impl ModuleKey {
    /// Create a new module key
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}@{EMPTY_VERSION_SENTINEL}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.version)
        }
    }
}

impl FromStr for ModuleKey {
    type Err = ModuleKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = s
            .split_once('@')
            .ok_or_else(|| ModuleKeyError::MissingSeparator { key: s.to_string() })?;

        if name.is_empty() {
            return Err(ModuleKeyError::EmptyName { key: s.to_string() });
        }

        let version = if version == EMPTY_VERSION_SENTINEL {
            ""
        } else {
            version
        };

        Ok(Self::new(name, version))
    }
}
