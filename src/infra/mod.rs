//! Infrastructure layer
//!
//! Handles all I/O operations: reading and writing lockfiles and locating
//! the config directory. This module is the only place where side effects occur.

pub mod dirs;
pub mod filesystem;
