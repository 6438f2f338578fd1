//! Configuration and constants
//!
//! - [`defaults`] - Default values
//! - [`urls`] - Registry URLs
//! - [`settings`] - User settings file (`config.toml`)

pub mod defaults;
pub mod settings;
pub mod urls;
