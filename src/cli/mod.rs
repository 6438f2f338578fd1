//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no lockfile logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::settings::Settings;
use crate::infra::dirs::ModlockDirs;
use commands::{CommandContext, Commands};
use output::OutputConfig;

/// modlock - inspect, merge and compare MODULE.bazel.lock files
#[derive(Parser, Debug)]
#[command(name = "modlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Output settings derived from the global flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            return Ok(());
        };

        let settings =
            Settings::load(&ModlockDirs::new()).context("Failed to load modlock settings")?;
        let output = OutputConfig::new(
            self.quiet,
            self.json || settings.json_output(),
            self.verbose,
        );
        let ctx = CommandContext { settings, output };

        command.run(&ctx)
    }
}
