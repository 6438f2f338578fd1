//! Versions command implementation
//!
//! Implements `modlock versions` to list the format version table.

use anyhow::Result;

use super::CommandContext;
use crate::core::versions::{CURRENT_LOCKFILE_VERSION, FORMAT_VERSIONS};

/// Execute the versions command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    if ctx.output.json {
        return ctx.output.print_json(FORMAT_VERSIONS);
    }
    if ctx.output.quiet {
        return Ok(());
    }

    println!(
        "modlock {} ({}, rustc {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    );
    println!();

    for info in FORMAT_VERSIONS {
        let marker = if info.version == CURRENT_LOCKFILE_VERSION {
            "*"
        } else {
            " "
        };
        let releases: Vec<String> = info.releases.iter().map(ToString::to_string).collect();
        println!("{marker}{:>3}  {}", info.version, releases.join(", "));
        println!("      {}", info.notes);
    }
    Ok(())
}
