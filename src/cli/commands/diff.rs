//! Diff command implementation
//!
//! Implements `modlock diff` to compare two lockfiles.

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::CommandContext;
use crate::core::diff::compare;
use crate::infra::filesystem::read_lockfile;

/// Execute the diff command
pub fn execute(ctx: &CommandContext, old: &Path, new: &Path, exit_code: bool) -> Result<()> {
    let old_lockfile =
        read_lockfile(old).with_context(|| format!("Failed to load {}", old.display()))?;
    let new_lockfile =
        read_lockfile(new).with_context(|| format!("Failed to load {}", new.display()))?;

    let diff = compare(&old_lockfile, &new_lockfile);

    if ctx.output.json {
        ctx.output.print_json(&diff)?;
    } else if !ctx.output.quiet {
        print!("{diff}");
    }

    if exit_code && !diff.is_empty() {
        bail!("Lockfiles differ: {}", diff.summary());
    }
    Ok(())
}
