//! Hash command implementation
//!
//! Implements `modlock hash` to print or verify a file's content digest.

use anyhow::{bail, Result};
use std::path::Path;

use super::CommandContext;
use crate::cli::output::status;
use crate::core::hasher;
use crate::infra::filesystem::read_file;

/// Execute the hash command
pub fn execute(
    ctx: &CommandContext,
    file: &Path,
    expect: Option<&str>,
    prefixed: bool,
) -> Result<()> {
    let content = read_file(file)?;

    if let Some(expected) = expect {
        if !hasher::verify(&content, expected) {
            bail!(
                "Digest mismatch for '{}': expected {expected}, got {}",
                file.display(),
                hasher::hash(&content)
            );
        }
        ctx.output
            .status(status::SUCCESS, format!("{} matches", file.display()));
        return Ok(());
    }

    let digest = if prefixed {
        hasher::hash_prefixed(&content)
    } else {
        hasher::hash(&content)
    };
    if !ctx.output.quiet {
        println!("{digest}  {}", file.display());
    }
    Ok(())
}
