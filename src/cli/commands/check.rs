//! Check command implementation
//!
//! Implements `modlock check` to report whether a lockfile's format
//! version can be used by this tool.

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::CommandContext;
use crate::cli::output::status;
use crate::core::hasher::DigestForm;
use crate::core::versions::{
    CompatibilityReport, CURRENT_LOCKFILE_VERSION, FORWARD_TOLERANCE, MIN_COMPATIBLE_VERSION,
};
use crate::infra::filesystem::read_lockfile;

/// Execute the check command
pub fn execute(ctx: &CommandContext, path: &Path, exact: bool) -> Result<()> {
    let lockfile = read_lockfile(path)
        .with_context(|| format!("Failed to load lockfile at {}", path.display()))?;

    let report = CompatibilityReport::for_lockfile(&lockfile);
    let digest_forms = lockfile.digest_forms();
    let mixed_digests = digest_forms.len() > 1;
    if mixed_digests {
        tracing::warn!(
            "{} mixes digest conventions: {:?}",
            path.display(),
            digest_forms
        );
    }

    if ctx.output.json {
        ctx.output.print_json(&report)?;
    } else {
        let prefix = if report.exact_match {
            status::SUCCESS
        } else if report.compatible {
            status::WARNING
        } else {
            status::ERROR
        };
        ctx.output.status(prefix, report.message());
        if mixed_digests {
            ctx.output.status(
                status::WARNING,
                "registry file hashes mix raw and sha256:-prefixed digests",
            );
        }
        if digest_forms.contains(&DigestForm::Unknown) {
            ctx.output.status(
                status::WARNING,
                "some registry file hashes are not SHA-256 digests",
            );
        }
    }

    if !report.compatible {
        bail!(
            "Lockfile format version {} is not supported (supported: {}..={})",
            report.version,
            MIN_COMPATIBLE_VERSION,
            CURRENT_LOCKFILE_VERSION + FORWARD_TOLERANCE
        );
    }
    if exact && !report.exact_match {
        bail!(
            "Lockfile format version {} does not match current version {}",
            report.version,
            report.current
        );
    }
    Ok(())
}
