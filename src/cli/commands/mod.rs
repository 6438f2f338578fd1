//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod check;
pub mod diff;
pub mod fmt;
pub mod hash;
pub mod import;
pub mod merge;
pub mod versions;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::cli::output::OutputConfig;
use crate::config::settings::Settings;
use crate::core::merge::ConflictStrategy;
use crate::infra::filesystem::lockfile_path;

/// State shared by all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// User settings
    pub settings: Settings,
    /// Output settings
    pub output: OutputConfig,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a lockfile's format version against this tool
    Check {
        /// Lockfile path (defaults to ./MODULE.bazel.lock)
        path: Option<PathBuf>,

        /// Fail unless the format version is exactly the current one
        #[arg(long)]
        exact: bool,
    },

    /// Rewrite a lockfile in canonical form
    Fmt {
        /// Lockfile path (defaults to ./MODULE.bazel.lock)
        path: Option<PathBuf>,

        /// Only report whether the file is canonical
        #[arg(long)]
        check: bool,
    },

    /// Show differences between two lockfiles
    Diff {
        /// Old lockfile
        old: PathBuf,

        /// New lockfile
        new: PathBuf,

        /// Exit with an error when the lockfiles differ
        #[arg(long)]
        exit_code: bool,
    },

    /// Merge one lockfile into another
    Merge {
        /// Lockfile merged into (created if missing)
        target: PathBuf,

        /// Lockfile merged from
        source: PathBuf,

        /// Conflict strategy: prefer-existing, prefer-new or error-on-conflict
        #[arg(short, long)]
        strategy: Option<ConflictStrategy>,

        /// Write the result here instead of over the target
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print or verify the content digest of a file
    Hash {
        /// File to hash
        file: PathBuf,

        /// Expected digest; fail if it does not match
        #[arg(long)]
        expect: Option<String>,

        /// Print the digest with a sha256: prefix
        #[arg(long)]
        prefixed: bool,
    },

    /// Build a lockfile from a JSON list of resolved modules
    Import {
        /// JSON file with resolved modules
        resolutions: PathBuf,

        /// Lockfile to write (defaults to ./MODULE.bazel.lock)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List lockfile format versions and the Bazel releases writing them
    Versions,
}

fn default_lockfile(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| lockfile_path(std::path::Path::new("")))
}

impl Commands {
    /// Execute the command
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Check { path, exact } => check::execute(ctx, &default_lockfile(path), exact),
            Self::Fmt { path, check } => fmt::execute(ctx, &default_lockfile(path), check),
            Self::Diff {
                old,
                new,
                exit_code,
            } => diff::execute(ctx, &old, &new, exit_code),
            Self::Merge {
                target,
                source,
                strategy,
                output,
            } => merge::execute(ctx, &target, &source, strategy, output.as_deref()),
            Self::Hash {
                file,
                expect,
                prefixed,
            } => hash::execute(ctx, &file, expect.as_deref(), prefixed),
            Self::Import {
                resolutions,
                output,
            } => import::execute(ctx, &resolutions, &default_lockfile(output)),
            Self::Versions => versions::execute(ctx),
        }
    }
}
