//! Lockfile comparison
//!
//! One result type covers both comparisons callers need: format version
//! churn, registry hash churn (added, removed, changed) and yanked-version
//! churn (added, removed). A changed yanked-version reason is not reported.
//! Every list is sorted by URL or module key.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::lockfile::Lockfile;
use crate::core::versions::FormatVersion;

/// A registry file whose digest differs between two lockfiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashChange {
    pub url: String,
    pub old_hash: String,
    pub new_hash: String,
}

/// Registry file URL with its digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashEntry {
    pub url: String,
    pub hash: String,
}

/// Differences between an old and a new lockfile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockfileDiff {
    pub version_changed: bool,
    pub old_version: FormatVersion,
    pub new_version: FormatVersion,
    /// Hashes only in the new lockfile
    pub added: Vec<HashEntry>,
    /// Hashes only in the old lockfile
    pub removed: Vec<HashEntry>,
    /// Hashes in both with different values
    pub changed: Vec<HashChange>,
    /// Yanked versions only allowed in the new lockfile
    pub yanked_added: Vec<String>,
    /// Yanked versions only allowed in the old lockfile
    pub yanked_removed: Vec<String>,
}

/// Compare two lockfiles
pub fn compare(old: &Lockfile, new: &Lockfile) -> LockfileDiff {
    let old_hashes: BTreeMap<&str, &str> = old
        .registry_file_hashes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let new_hashes: BTreeMap<&str, &str> = new
        .registry_file_hashes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let mut diff = LockfileDiff {
        version_changed: old.version != new.version,
        old_version: old.version,
        new_version: new.version,
        ..LockfileDiff::default()
    };

    for (url, new_hash) in &new_hashes {
        match old_hashes.get(url) {
            None => diff.added.push(HashEntry {
                url: (*url).to_string(),
                hash: (*new_hash).to_string(),
            }),
            Some(old_hash) if old_hash != new_hash => diff.changed.push(HashChange {
                url: (*url).to_string(),
                old_hash: (*old_hash).to_string(),
                new_hash: (*new_hash).to_string(),
            }),
            Some(_) => {}
        }
    }

    diff.removed = old_hashes
        .iter()
        .filter(|(url, _)| !new_hashes.contains_key(*url))
        .map(|(url, hash)| HashEntry {
            url: (*url).to_string(),
            hash: (*hash).to_string(),
        })
        .collect();

    let old_yanked: BTreeSet<&String> = old.selected_yanked_versions.keys().collect();
    let new_yanked: BTreeSet<&String> = new.selected_yanked_versions.keys().collect();
    diff.yanked_added = new_yanked
        .difference(&old_yanked)
        .map(|key| (*key).clone())
        .collect();
    diff.yanked_removed = old_yanked
        .difference(&new_yanked)
        .map(|key| (*key).clone())
        .collect();

    diff
}

impl LockfileDiff {
    /// Whether nothing differs
    pub fn is_empty(&self) -> bool {
        !self.version_changed
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.yanked_added.is_empty()
            && self.yanked_removed.is_empty()
    }

    /// Short human-readable report
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No changes".to_string();
        }

        let mut parts = Vec::new();
        if self.version_changed {
            parts.push(format!(
                "version {} -> {}",
                self.old_version, self.new_version
            ));
        }
        for (count, label) in [
            (self.added.len(), "added"),
            (self.removed.len(), "removed"),
            (self.changed.len(), "changed"),
        ] {
            if count > 0 {
                parts.push(format!("{count} hash(es) {label}"));
            }
        }
        for (count, label) in [
            (self.yanked_added.len(), "allowed"),
            (self.yanked_removed.len(), "no longer allowed"),
        ] {
            if count > 0 {
                parts.push(format!("{count} yanked version(s) {label}"));
            }
        }
        parts.join(", ")
    }
}

impl fmt::Display for LockfileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        if self.version_changed {
            writeln!(f, "~ lockFileVersion: {} -> {}", self.old_version, self.new_version)?;
        }
        for entry in &self.added {
            writeln!(f, "+ {} {}", entry.url, entry.hash)?;
        }
        for entry in &self.removed {
            writeln!(f, "- {} {}", entry.url, entry.hash)?;
        }
        for change in &self.changed {
            writeln!(f, "~ {} {} -> {}", change.url, change.old_hash, change.new_hash)?;
        }
        for key in &self.yanked_added {
            writeln!(f, "+ yanked {key}")?;
        }
        for key in &self.yanked_removed {
            writeln!(f, "- yanked {key}")?;
        }
        Ok(())
    }
}

impl Lockfile {
    /// Differences from this lockfile to `other`
    pub fn diff(&self, other: &Lockfile) -> LockfileDiff {
        compare(self, other)
    }
}
