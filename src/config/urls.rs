//! Registry URLs

/// Bazel Central Registry, used when a module has no registry URL
pub const DEFAULT_REGISTRY: &str = "https://bcr.bazel.build";
