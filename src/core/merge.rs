//! Lockfile merging
//!
//! Combines a source lockfile into a target lockfile in place, e.g. when
//! joining the results of sharded resolutions.
//!
//! Fields are merged in a fixed order: registry file hashes, selected
//! yanked versions, module extensions, facts. Nothing is rolled back on
//! error, so a conflict in the hashes leaves the later fields untouched.
//!
//! Hashes and yanked versions honor the full [`ConflictStrategy`],
//! including the hard error. Extension results and facts are opaque, so
//! they only have two outcomes: [`ConflictStrategy::PreferNew`] overwrites,
//! every other strategy keeps the existing value. They never fail.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::lockfile::{ExtensionResults, Lockfile, Payload};

/// Merge conflict errors
#[derive(Error, Debug, PartialEq)]
pub enum MergeError {
    /// Same registry file recorded with different digests
    #[error("Conflicting hash for '{url}': existing {existing}, incoming {incoming}")]
    HashConflict {
        url: String,
        existing: String,
        incoming: String,
    },

    /// Same yanked version allowed with different reasons
    #[error("Conflicting yanked version reason for '{module}': existing '{existing}', incoming '{incoming}'")]
    YankedConflict {
        module: String,
        existing: String,
        incoming: String,
    },
}

/// What to do when both lockfiles hold different values for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    /// Keep the target's value
    PreferExisting,
    /// Take the source's value
    PreferNew,
    /// Fail on hash and yanked-version conflicts
    #[default]
    ErrorOnConflict,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PreferExisting => "prefer-existing",
            Self::PreferNew => "prefer-new",
            Self::ErrorOnConflict => "error-on-conflict",
        })
    }
}

/// Unknown strategy name
#[derive(Error, Debug, PartialEq)]
#[error("Unknown conflict strategy '{0}': expected prefer-existing, prefer-new or error-on-conflict")]
pub struct UnknownStrategy(pub String);

impl FromStr for ConflictStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefer-existing" => Ok(Self::PreferExisting),
            "prefer-new" => Ok(Self::PreferNew),
            "error-on-conflict" => Ok(Self::ErrorOnConflict),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Merge options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Conflict strategy
    pub strategy: ConflictStrategy,
    /// Advisory only: values are always compared to detect conflicts
    pub verify_hashes: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strategy: ConflictStrategy::default(),
            verify_hashes: true,
        }
    }
}

impl MergeOptions {
    /// Options with the given strategy
    pub fn with_strategy(strategy: ConflictStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// Counts of what a merge did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Entries copied from the source
    pub added: usize,
    /// Target entries replaced by the source's value
    pub overwritten: usize,
    /// Conflicting entries where the target's value was kept
    pub kept: usize,
}

/// Merge `source` into `target`
///
/// A `None` source is a no-op. Under [`ConflictStrategy::ErrorOnConflict`]
/// the first conflict (in sorted key order) is returned and the target
/// keeps whatever was merged before it.
pub fn merge(
    target: &mut Lockfile,
    source: Option<&Lockfile>,
    options: &MergeOptions,
) -> Result<MergeReport, MergeError> {
    let Some(source) = source else {
        return Ok(MergeReport::default());
    };

    if !options.verify_hashes {
        debug!("Hash verification disabled; conflicting values are still detected");
    }

    let mut report = MergeReport::default();

    merge_strings(
        &mut target.registry_file_hashes,
        &source.registry_file_hashes,
        options.strategy,
        &mut report,
        |url, existing, incoming| MergeError::HashConflict {
            url: url.to_string(),
            existing: existing.to_string(),
            incoming: incoming.to_string(),
        },
    )?;

    merge_strings(
        &mut target.selected_yanked_versions,
        &source.selected_yanked_versions,
        options.strategy,
        &mut report,
        |module, existing, incoming| MergeError::YankedConflict {
            module: module.to_string(),
            existing: existing.to_string(),
            incoming: incoming.to_string(),
        },
    )?;

    for (extension, incoming) in sorted(&source.module_extensions) {
        match target.module_extensions.get_mut(extension) {
            Some(existing) => {
                merge_payloads(existing, incoming, options.strategy, &mut report);
            }
            None => {
                report.added += incoming.len();
                target
                    .module_extensions
                    .insert(extension.clone(), incoming.clone());
            }
        }
    }

    merge_payloads(&mut target.facts, &source.facts, options.strategy, &mut report);

    info!(
        "Merged lockfile: {} added, {} overwritten, {} kept",
        report.added, report.overwritten, report.kept
    );
    Ok(report)
}

fn sorted<V>(map: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn merge_strings(
    target: &mut HashMap<String, String>,
    source: &HashMap<String, String>,
    strategy: ConflictStrategy,
    report: &mut MergeReport,
    conflict: impl Fn(&str, &str, &str) -> MergeError,
) -> Result<(), MergeError> {
    for (key, incoming) in sorted(source) {
        let Some(existing) = target.get_mut(key) else {
            target.insert(key.clone(), incoming.clone());
            report.added += 1;
            continue;
        };

        if existing == incoming {
            continue;
        }

        match strategy {
            ConflictStrategy::PreferExisting => {
                debug!("Keeping existing value for '{key}'");
                report.kept += 1;
            }
            ConflictStrategy::PreferNew => {
                debug!("Overwriting value for '{key}'");
                existing.clone_from(incoming);
                report.overwritten += 1;
            }
            ConflictStrategy::ErrorOnConflict => {
                return Err(conflict(key.as_str(), existing.as_str(), incoming.as_str()));
            }
        }
    }
    Ok(())
}

fn merge_payloads(
    target: &mut ExtensionResults,
    source: &HashMap<String, Payload>,
    strategy: ConflictStrategy,
    report: &mut MergeReport,
) {
    for (key, incoming) in sorted(source) {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), incoming.clone());
                report.added += 1;
            }
            Some(existing) if strategy == ConflictStrategy::PreferNew => {
                if existing != incoming {
                    *existing = incoming.clone();
                    report.overwritten += 1;
                }
            }
            Some(existing) => {
                if existing != incoming {
                    report.kept += 1;
                }
            }
        }
    }
}

impl Lockfile {
    /// Merge another lockfile into this one; see [`merge`]
    pub fn merge(
        &mut self,
        source: &Lockfile,
        options: &MergeOptions,
    ) -> Result<MergeReport, MergeError> {
        merge(self, Some(source), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::module_key::ModuleKey;

    const URL: &str = "https://bcr.bazel.build/modules/zlib/1.3/MODULE.bazel";

    fn with_hash(hash: &str) -> Lockfile {
        let mut lockfile = Lockfile::new();
        lockfile.set_registry_hash(URL, hash);
        lockfile
    }

    fn payload(text: &str) -> Payload {
        Payload::from_json(text).unwrap()
    }

    // ============================================
    // Unit Tests - Registry hashes
    // ============================================

    #[test]
    fn test_merge_adds_missing_hash() {
        let mut target = Lockfile::new();
        let report = target
            .merge(&with_hash("aa"), &MergeOptions::default())
            .unwrap();
        assert_eq!(target.registry_hash(URL), Some("aa"));
        assert_eq!(report.added, 1);
    }

    #[test]
    fn test_merge_equal_hash_is_noop() {
        let mut target = with_hash("aa");
        let report = target
            .merge(&with_hash("aa"), &MergeOptions::default())
            .unwrap();
        assert_eq!(report, MergeReport::default());
    }

    #[test]
    fn test_merge_conflict_prefer_new() {
        let mut target = with_hash("aa");
        let options = MergeOptions::with_strategy(ConflictStrategy::PreferNew);
        let report = target.merge(&with_hash("bb"), &options).unwrap();
        assert_eq!(target.registry_hash(URL), Some("bb"));
        assert_eq!(report.overwritten, 1);
    }

    #[test]
    fn test_merge_conflict_prefer_existing() {
        let mut target = with_hash("aa");
        let options = MergeOptions::with_strategy(ConflictStrategy::PreferExisting);
        let report = target.merge(&with_hash("bb"), &options).unwrap();
        assert_eq!(target.registry_hash(URL), Some("aa"));
        assert_eq!(report.kept, 1);
    }

    #[test]
    fn test_merge_conflict_error_stops_before_later_fields() {
        let mut target = with_hash("aa");
        let mut source = with_hash("bb");
        source.allow_yanked_version(&ModuleKey::new("zlib", "1.2"), "cve fix pending");
        source.set_extension_result("ext", "linux", payload("{}"));
        source.set_fact("fact", payload("1"));

        let err = target
            .merge(&source, &MergeOptions::with_strategy(ConflictStrategy::ErrorOnConflict))
            .unwrap_err();

        assert_eq!(
            err,
            MergeError::HashConflict {
                url: URL.to_string(),
                existing: "aa".to_string(),
                incoming: "bb".to_string(),
            }
        );
        assert_eq!(target.registry_hash(URL), Some("aa"));
        assert!(target.selected_yanked_versions.is_empty());
        assert!(target.module_extensions.is_empty());
        assert!(target.facts.is_empty());
    }

    #[test]
    fn test_merge_error_keeps_entries_merged_before_conflict() {
        let mut target = with_hash("aa");
        let mut source = with_hash("bb");
        // Sorts before URL, so it is merged before the conflict is hit
        source.set_registry_hash("https://a.example/MODULE.bazel", "cc");

        assert!(target.merge(&source, &MergeOptions::default()).is_err());
        assert_eq!(target.registry_hash("https://a.example/MODULE.bazel"), Some("cc"));
    }

    // ============================================
    // Unit Tests - Yanked versions
    // ============================================

    #[test]
    fn test_merge_yanked_conflict() {
        let key = ModuleKey::new("zlib", "1.2");
        let mut target = Lockfile::new();
        target.allow_yanked_version(&key, "old reason");
        let mut source = Lockfile::new();
        source.allow_yanked_version(&key, "new reason");

        let err = target
            .clone()
            .merge(&source, &MergeOptions::default())
            .unwrap_err();
        assert!(matches!(err, MergeError::YankedConflict { ref module, .. } if module == "zlib@1.2"));

        target
            .merge(&source, &MergeOptions::with_strategy(ConflictStrategy::PreferNew))
            .unwrap();
        assert_eq!(target.yanked_version_reason(&key), Some("new reason"));
    }

    // ============================================
    // Unit Tests - Extensions and facts
    // ============================================

    #[test]
    fn test_merge_copies_missing_extension() {
        let mut target = Lockfile::new();
        let mut source = Lockfile::new();
        source.set_extension_result("ext", "linux", payload("1"));
        source.set_extension_result("ext", "darwin", payload("2"));

        let report = target.merge(&source, &MergeOptions::default()).unwrap();
        assert_eq!(target.module_extensions, source.module_extensions);
        assert_eq!(report.added, 2);
    }

    #[test]
    fn test_merge_extension_factors() {
        let mut target = Lockfile::new();
        target.set_extension_result("ext", "linux", payload("1"));
        let mut source = Lockfile::new();
        source.set_extension_result("ext", "linux", payload("2"));
        source.set_extension_result("ext", "darwin", payload("3"));

        let mut kept = target.clone();
        kept.merge(&source, &MergeOptions::with_strategy(ConflictStrategy::PreferExisting))
            .unwrap();
        assert_eq!(kept.extension_result("ext", "linux"), Some(&payload("1")));
        assert_eq!(kept.extension_result("ext", "darwin"), Some(&payload("3")));

        let mut replaced = target.clone();
        replaced
            .merge(&source, &MergeOptions::with_strategy(ConflictStrategy::PreferNew))
            .unwrap();
        assert_eq!(replaced.extension_result("ext", "linux"), Some(&payload("2")));
    }

    #[test]
    fn test_merge_extension_conflict_never_errors() {
        let mut target = Lockfile::new();
        target.set_extension_result("ext", "linux", payload("1"));
        target.set_fact("fact", payload("1"));
        let mut source = Lockfile::new();
        source.set_extension_result("ext", "linux", payload("2"));
        source.set_fact("fact", payload("2"));

        let report = target
            .merge(&source, &MergeOptions::with_strategy(ConflictStrategy::ErrorOnConflict))
            .unwrap();
        assert_eq!(target.extension_result("ext", "linux"), Some(&payload("1")));
        assert_eq!(target.fact("fact"), Some(&payload("1")));
        assert_eq!(report.kept, 2);
    }

    #[test]
    fn test_merge_facts_prefer_new() {
        let mut target = Lockfile::new();
        target.set_fact("fact", payload("1"));
        let mut source = Lockfile::new();
        source.set_fact("fact", payload("2"));
        source.set_fact("other", payload("3"));

        target
            .merge(&source, &MergeOptions::with_strategy(ConflictStrategy::PreferNew))
            .unwrap();
        assert_eq!(target.fact("fact"), Some(&payload("2")));
        assert_eq!(target.fact("other"), Some(&payload("3")));
    }

    #[test]
    fn test_merge_none_source_is_noop() {
        let mut target = with_hash("aa");
        let before = target.clone();
        let report = merge(&mut target, None, &MergeOptions::default()).unwrap();
        assert_eq!(target, before);
        assert_eq!(report, MergeReport::default());
    }

    #[test]
    fn test_merge_keeps_target_version() {
        let mut target = Lockfile::with_version(18);
        target
            .merge(&Lockfile::with_version(26), &MergeOptions::default())
            .unwrap();
        assert_eq!(target.version, 18);
    }

    #[test]
    fn test_strategy_parse_and_display() {
        for strategy in [
            ConflictStrategy::PreferExisting,
            ConflictStrategy::PreferNew,
            ConflictStrategy::ErrorOnConflict,
        ] {
            assert_eq!(strategy.to_string().parse::<ConflictStrategy>(), Ok(strategy));
        }
        assert!("newest".parse::<ConflictStrategy>().is_err());
    }
}
