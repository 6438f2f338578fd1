//! Core lockfile engine
//!
//! This module contains all lockfile logic.
//! It has NO I/O operations - those belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`versions`] - Format version table and compatibility queries
//! - [`hasher`] - Content integrity digests
//! - [`module_key`] - `name@version` keys
//! - [`lockfile`] - Lockfile model and accessors
//! - [`codec`] - Deterministic serialization and parsing
//! - [`merge`] - Merging two lockfiles under a conflict strategy
//! - [`diff`] - Comparing two lockfiles
//! - [`importer`] - Building a lockfile from resolution results

pub mod codec;
pub mod diff;
pub mod hasher;
pub mod importer;
pub mod lockfile;
pub mod merge;
pub mod module_key;
pub mod versions;
