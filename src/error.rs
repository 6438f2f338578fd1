//! Error types for modlock
//!
//! Domain-specific error types using thiserror. Errors local to one
//! engine component live next to it (e.g. [`CodecError`], [`MergeError`]);
//! [`ModlockError`] gathers them for callers working across components.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::settings::SettingsError;
pub use crate::core::codec::CodecError;
pub use crate::core::merge::MergeError;
pub use crate::core::module_key::ModuleKeyError;
pub use crate::core::versions::BazelVersionError;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Top-level modlock error type
#[derive(Error, Debug)]
pub enum ModlockError {
    /// Lockfile could not be parsed or serialized
    #[error("Lockfile error in '{path}': {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Merge conflict
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Settings error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}
