//! Merge command implementation
//!
//! Implements `modlock merge` to combine two lockfiles. Nothing is
//! written when the merge fails.

use anyhow::{Context, Result};
use std::path::Path;

use super::CommandContext;
use crate::cli::output::status;
use crate::core::merge::ConflictStrategy;
use crate::infra::filesystem::{read_lockfile, read_lockfile_or_default, write_lockfile};

/// Execute the merge command
pub fn execute(
    ctx: &CommandContext,
    target: &Path,
    source: &Path,
    strategy: Option<ConflictStrategy>,
    output: Option<&Path>,
) -> Result<()> {
    let mut merged = read_lockfile_or_default(target)
        .with_context(|| format!("Failed to load {}", target.display()))?;
    let incoming =
        read_lockfile(source).with_context(|| format!("Failed to load {}", source.display()))?;

    let options = ctx.settings.merge_options(strategy);
    tracing::info!("Merging {} into {} ({})", source.display(), target.display(), options.strategy);

    let report = merged
        .merge(&incoming, &options)
        .with_context(|| format!("Merge aborted; {} left unchanged", target.display()))?;

    let destination = output.unwrap_or(target);
    write_lockfile(destination, &merged, ctx.settings.indent())?;

    if ctx.output.json {
        ctx.output.print_json(&report)?;
    } else {
        ctx.output.status(
            status::SUCCESS,
            format!(
                "Merged into {}: {} added, {} overwritten, {} kept",
                destination.display(),
                report.added,
                report.overwritten,
                report.kept
            ),
        );
    }
    Ok(())
}
