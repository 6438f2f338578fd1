//! Import command implementation
//!
//! Implements `modlock import` to build a lockfile from a JSON list of
//! resolved modules. Modules without a registry URL use the configured
//! default registry.

use anyhow::{Context, Result};
use std::path::Path;

use super::CommandContext;
use crate::cli::output::status;
use crate::core::importer::{from_resolution_with_registry, ModuleResolution};
use crate::infra::filesystem::{read_file, write_lockfile};

/// Execute the import command
pub fn execute(ctx: &CommandContext, path: &Path, output: &Path) -> Result<()> {
    let content = read_file(path)?;
    let resolutions: Vec<ModuleResolution> = serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse resolutions at {}", path.display()))?;

    let registry = ctx.settings.default_registry();
    tracing::info!(
        "Importing {} resolved modules (default registry {registry})",
        resolutions.len()
    );
    let lockfile = from_resolution_with_registry(&resolutions, registry);

    write_lockfile(output, &lockfile, ctx.settings.indent())?;

    let hashes = lockfile.registry_file_hashes.len();
    let yanked = lockfile.selected_yanked_versions.len();
    if ctx.output.json {
        ctx.output.print_json(&serde_json::json!({
            "path": output.display().to_string(),
            "registry_file_hashes": hashes,
            "selected_yanked_versions": yanked,
        }))?;
    } else {
        ctx.output.status(
            status::SUCCESS,
            format!(
                "Wrote {}: {hashes} registry hashes, {yanked} yanked versions",
                output.display()
            ),
        );
    }
    Ok(())
}
