//! Default configuration values

/// Lockfile name at the workspace root
pub const LOCKFILE_NAME: &str = "MODULE.bazel.lock";

/// Indentation used when writing lockfiles
pub const DEFAULT_INDENT: &str = "  ";

/// Permission bits for written lockfiles (owner read/write)
pub const LOCKFILE_MODE: u32 = 0o600;

/// Settings file name inside the config directory
pub const SETTINGS_FILE_NAME: &str = "config.toml";
