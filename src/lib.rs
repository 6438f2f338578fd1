//! modlock - MODULE.bazel.lock engine
//!
//! This library records the reproducibility state of a Bazel module
//! resolution: registry file digests, explicitly allowed yanked versions
//! and opaque module extension results. It writes that state
//! deterministically, checks it against Bazel's lockfile format versions,
//! and merges or compares two lockfiles.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`core`] - Lockfile engine (no I/O operations)
//! - [`infra`] - Infrastructure layer (filesystem)
//! - [`config`] - Configuration and constants
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

pub use crate::core::lockfile::{Lockfile, Payload};
pub use crate::core::module_key::ModuleKey;

#[cfg(test)]
pub mod test_utils;
