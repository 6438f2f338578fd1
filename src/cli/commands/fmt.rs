//! Fmt command implementation
//!
//! Implements `modlock fmt` to rewrite a lockfile in canonical form.

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::CommandContext;
use crate::cli::output::status;
use crate::core::codec;
use crate::infra::filesystem::{read_file, write_private_file};

/// Execute the fmt command
pub fn execute(ctx: &CommandContext, path: &Path, check_only: bool) -> Result<()> {
    let original = read_file(path)?;
    let lockfile = codec::parse(&original)
        .with_context(|| format!("Failed to parse lockfile at {}", path.display()))?;
    let canonical = codec::serialize_for_file(&lockfile, ctx.settings.indent())?;

    if canonical == original {
        ctx.output
            .status(status::SUCCESS, format!("{} is canonical", path.display()));
        return Ok(());
    }

    if check_only {
        bail!("{} is not in canonical form", path.display());
    }

    write_private_file(path, &canonical)?;
    ctx.output
        .status(status::SUCCESS, format!("Formatted {}", path.display()));
    Ok(())
}
