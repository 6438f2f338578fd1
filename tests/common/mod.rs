//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory acting as a Bazel workspace and provides
/// utilities for setting up lockfiles and running the CLI in it.
pub struct TestProject {
    /// Temporary directory for the test workspace
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test workspace
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Run the modlock binary in the workspace with an isolated config directory
    #[allow(dead_code)]
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_modlock"))
            .current_dir(self.path())
            .env("MODLOCK_CONFIG_DIR", self.path().join(".modlock-config"))
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute modlock")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest of "hello world"
#[allow(dead_code)]
pub const HELLO_WORLD_SHA256: &str =
    "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

/// Sample lockfile with unsorted keys and compact layout
#[allow(dead_code)]
pub const SAMPLE_LOCKFILE: &str = r#"{"lockFileVersion": 26,
"registryFileHashes": {
  "https://bcr.bazel.build/modules/zlib/1.3.1/MODULE.bazel": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
  "https://bcr.bazel.build/modules/abseil-cpp/20240116.2/MODULE.bazel": "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
},
"selectedYankedVersions": {"protobuf@3.19.0": "pinned by grpc"},
"moduleExtensions": {
  "@@rules_go+//go:extensions.bzl%go_sdk": {
    "os:linux,arch:amd64": {"generatedRepoSpecs": {"go_sdk": {"version": "1.22.0"}}, "bzlTransitiveDigest": "abc="}
  }
},
"facts": {}}
"#;

/// Sample lockfile in an old format version
#[allow(dead_code)]
pub const OLD_LOCKFILE: &str = r#"{"lockFileVersion": 3, "moduleFileHash": "x"}"#;
