//! Lockfile format versions
//!
//! This module handles:
//! - The static table of lockfile format versions and the Bazel releases emitting them
//! - Lookups in both directions (release to format version, format version to releases)
//! - Compatibility queries for a parsed lockfile
//!
//! Two compatibility notions exist. A lockfile is only trusted as up to date
//! when its format version equals [`CURRENT_LOCKFILE_VERSION`] exactly
//! ([`is_exact_match`]). Reading is more lenient: anything from the first
//! incremental format up to a small margin past the current version is
//! accepted ([`is_compatible`]).

use semver::Version;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::lockfile::Lockfile;

/// Lockfile format version number
///
/// Signed and wide so that any integer found in a lockfile is kept as is.
pub type FormatVersion = i64;

/// Format version written by this engine
pub const CURRENT_LOCKFILE_VERSION: FormatVersion = 26;

/// Oldest format version that can still be read (first incremental format)
pub const MIN_COMPATIBLE_VERSION: FormatVersion = 11;

/// How many format versions past the current one are still read
pub const FORWARD_TOLERANCE: FormatVersion = 4;

/// Errors related to Bazel release strings
#[derive(Error, Debug, PartialEq)]
pub enum BazelVersionError {
    /// Not a `major.minor.patch` triple
    #[error("Invalid Bazel version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },
}

/// A Bazel release identified by `major.minor.patch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BazelVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl BazelVersion {
    /// Create a new release triple
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for BazelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for BazelVersion {
    type Err = BazelVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| BazelVersionError::InvalidVersion {
            version: s.to_string(),
            reason,
        };

        let parsed = Version::parse(s).map_err(|e| invalid(e.to_string()))?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(invalid(
                "pre-release and build metadata are not supported".to_string(),
            ));
        }

        let component = |value: u64| {
            u32::try_from(value).map_err(|_| invalid(format!("component {value} is too large")))
        };

        Ok(Self::new(
            component(parsed.major)?,
            component(parsed.minor)?,
            component(parsed.patch)?,
        ))
    }
}

impl Serialize for BazelVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the format version table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormatVersionInfo {
    /// Lockfile format version
    pub version: FormatVersion,
    /// Releases that write this format version
    pub releases: &'static [BazelVersion],
    /// Major release lines (LTS tracks) shipping this format
    pub lts_lines: &'static [u32],
    /// What changed in this format version
    pub notes: &'static str,
}

const fn v(major: u32, minor: u32, patch: u32) -> BazelVersion {
    BazelVersion::new(major, minor, patch)
}

/// Known format versions, ascending
pub static FORMAT_VERSIONS: &[FormatVersionInfo] = &[
    FormatVersionInfo {
        version: 1,
        releases: &[v(6, 3, 0), v(6, 3, 1), v(6, 3, 2)],
        lts_lines: &[6],
        notes: "initial lockfile with the resolved module graph",
    },
    FormatVersionInfo {
        version: 3,
        releases: &[v(6, 4, 0), v(6, 5, 0), v(7, 0, 0), v(7, 0, 1), v(7, 0, 2)],
        lts_lines: &[6, 7],
        notes: "module extension results keyed by extension",
    },
    FormatVersionInfo {
        version: 6,
        releases: &[v(7, 1, 0), v(7, 1, 1), v(7, 1, 2)],
        lts_lines: &[7],
        notes: "per-platform extension results",
    },
    FormatVersionInfo {
        version: 11,
        releases: &[v(7, 2, 0), v(7, 2, 1), v(7, 3, 0), v(7, 3, 1), v(7, 3, 2)],
        lts_lines: &[7],
        notes: "incremental format: registry file hashes, selected yanked versions, factors",
    },
    FormatVersionInfo {
        version: 13,
        releases: &[
            v(7, 4, 0),
            v(7, 4, 1),
            v(7, 5, 0),
            v(7, 6, 0),
            v(7, 6, 1),
            v(7, 6, 2),
            v(7, 7, 0),
        ],
        lts_lines: &[7],
        notes: "extension usages digest moved into factors",
    },
    FormatVersionInfo {
        version: 16,
        releases: &[v(8, 0, 0), v(8, 0, 1)],
        lts_lines: &[8],
        notes: "reproducible extensions are no longer recorded",
    },
    FormatVersionInfo {
        version: 18,
        releases: &[
            v(8, 1, 0),
            v(8, 1, 1),
            v(8, 2, 0),
            v(8, 2, 1),
            v(8, 3, 0),
            v(8, 3, 1),
            v(8, 4, 0),
            v(8, 4, 1),
            v(8, 4, 2),
        ],
        lts_lines: &[8],
        notes: "facts recorded alongside extension results",
    },
    FormatVersionInfo {
        version: CURRENT_LOCKFILE_VERSION,
        releases: &[v(9, 0, 0)],
        lts_lines: &[9],
        notes: "current format",
    },
];

/// Format version written by this engine
pub fn current_version() -> FormatVersion {
    CURRENT_LOCKFILE_VERSION
}

/// Look up the format version written by a Bazel release
pub fn version_for_release(major: u32, minor: u32, patch: u32) -> Option<FormatVersion> {
    let release = BazelVersion::new(major, minor, patch);
    FORMAT_VERSIONS
        .iter()
        .find(|info| info.releases.contains(&release))
        .map(|info| info.version)
}

/// Releases that write a format version; empty when the version is unknown
pub fn releases_for_version(version: FormatVersion) -> Vec<BazelVersion> {
    format_info(version)
        .map(|info| info.releases.to_vec())
        .unwrap_or_default()
}

/// All known format versions in ascending order
pub fn known_versions() -> Vec<FormatVersion> {
    let mut versions: Vec<FormatVersion> = FORMAT_VERSIONS.iter().map(|info| info.version).collect();
    versions.sort_unstable();
    versions.dedup();
    versions
}

/// Table row for a format version
pub fn format_info(version: FormatVersion) -> Option<&'static FormatVersionInfo> {
    FORMAT_VERSIONS.iter().find(|info| info.version == version)
}

/// Releases a lockfile of this format version requires, `None` if unknown
///
/// Used to build messages such as "this lockfile requires Bazel 8.1.0".
pub fn required_releases(version: FormatVersion) -> Option<Vec<BazelVersion>> {
    format_info(version).map(|info| info.releases.to_vec())
}

/// Newest release writing a format version
pub fn latest_release_for_version(version: FormatVersion) -> Option<BazelVersion> {
    format_info(version).and_then(|info| info.releases.iter().max().copied())
}

/// Whether a format version falls inside the read-compatibility window
pub fn is_compatible_version(version: FormatVersion) -> bool {
    (MIN_COMPATIBLE_VERSION..=CURRENT_LOCKFILE_VERSION + FORWARD_TOLERANCE).contains(&version)
}

/// Whether a lockfile can be read by this engine
pub fn is_compatible(lockfile: &Lockfile) -> bool {
    is_compatible_version(lockfile.version)
}

/// Whether a lockfile was written in exactly the current format
pub fn is_exact_match(lockfile: &Lockfile) -> bool {
    lockfile.version == CURRENT_LOCKFILE_VERSION
}

/// Compatibility facts about one lockfile, for building user-facing messages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityReport {
    /// Format version found in the lockfile
    pub version: FormatVersion,
    /// Format version this engine writes
    pub current: FormatVersion,
    /// Inside the read-compatibility window
    pub compatible: bool,
    /// Equal to the current format version
    pub exact_match: bool,
    /// Releases writing the lockfile's format, if the version is known
    pub required_releases: Option<Vec<BazelVersion>>,
}

impl CompatibilityReport {
    /// Build a report for a lockfile
    pub fn for_lockfile(lockfile: &Lockfile) -> Self {
        Self {
            version: lockfile.version,
            current: CURRENT_LOCKFILE_VERSION,
            compatible: is_compatible(lockfile),
            exact_match: is_exact_match(lockfile),
            required_releases: required_releases(lockfile.version),
        }
    }

    /// One-line description of the result
    pub fn message(&self) -> String {
        if self.exact_match {
            return format!("lockfile format version {} is current", self.version);
        }

        let requirement = match &self.required_releases {
            Some(releases) if !releases.is_empty() => {
                let names: Vec<String> = releases.iter().map(ToString::to_string).collect();
                format!("written by Bazel {}", names.join(", "))
            }
            _ => "not written by any known Bazel release".to_string(),
        };

        let verdict = if self.compatible {
            "readable but not current"
        } else {
            "incompatible"
        };

        format!(
            "lockfile format version {} ({requirement}) is {verdict}; this tool writes version {}",
            self.version, self.current
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lockfile_with_version(version: FormatVersion) -> Lockfile {
        Lockfile {
            version,
            ..Lockfile::new()
        }
    }

    // ============================================
    // Unit Tests - Table lookups
    // ============================================

    #[test]
    fn test_version_for_release_known() {
        assert_eq!(version_for_release(7, 2, 0), Some(11));
        assert_eq!(version_for_release(8, 4, 2), Some(18));
        assert_eq!(version_for_release(9, 0, 0), Some(CURRENT_LOCKFILE_VERSION));
    }

    #[test]
    fn test_version_for_release_unknown() {
        assert_eq!(version_for_release(5, 0, 0), None);
        assert_eq!(version_for_release(7, 2, 9), None);
    }

    #[test]
    fn test_releases_for_version() {
        let releases = releases_for_version(16);
        assert_eq!(releases, vec![BazelVersion::new(8, 0, 0), BazelVersion::new(8, 0, 1)]);
        assert!(releases_for_version(2).is_empty());
    }

    #[test]
    fn test_known_versions_sorted_and_unique() {
        let versions = known_versions();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(versions.first(), Some(&1));
        assert_eq!(versions.last(), Some(&CURRENT_LOCKFILE_VERSION));
    }

    #[test]
    fn test_table_rows_are_well_formed() {
        let mut seen = std::collections::HashSet::new();
        for info in FORMAT_VERSIONS {
            assert!(!info.releases.is_empty(), "version {} has no releases", info.version);
            for release in info.releases {
                assert!(seen.insert(*release), "release {release} listed twice");
            }
        }
    }

    #[test]
    fn test_required_releases() {
        assert_eq!(
            required_releases(CURRENT_LOCKFILE_VERSION),
            Some(vec![BazelVersion::new(9, 0, 0)])
        );
        assert_eq!(required_releases(999), None);
    }

    #[test]
    fn test_latest_release_for_version() {
        assert_eq!(latest_release_for_version(13), Some(BazelVersion::new(7, 7, 0)));
        assert_eq!(latest_release_for_version(4), None);
    }

    // ============================================
    // Unit Tests - Compatibility
    // ============================================

    #[test]
    fn test_compatibility_window_boundaries() {
        assert!(!is_compatible(&lockfile_with_version(10)));
        assert!(is_compatible(&lockfile_with_version(11)));
        assert!(is_compatible(&lockfile_with_version(CURRENT_LOCKFILE_VERSION)));
        assert!(is_compatible(&lockfile_with_version(30)));
        assert!(!is_compatible(&lockfile_with_version(31)));
        assert!(!is_compatible(&lockfile_with_version(-1)));
        assert!(!is_compatible(&lockfile_with_version(5_000_000_000)));
    }

    #[test]
    fn test_exact_match_only_at_current() {
        assert!(is_exact_match(&lockfile_with_version(CURRENT_LOCKFILE_VERSION)));
        assert!(!is_exact_match(&lockfile_with_version(CURRENT_LOCKFILE_VERSION - 1)));
        assert!(!is_exact_match(&lockfile_with_version(CURRENT_LOCKFILE_VERSION + 1)));
    }

    #[test]
    fn test_report_for_unknown_version() {
        let report = CompatibilityReport::for_lockfile(&lockfile_with_version(28));
        assert!(report.compatible);
        assert!(!report.exact_match);
        assert!(report.required_releases.is_none());
        assert!(report.message().contains("not written by any known Bazel release"));
    }

    #[test]
    fn test_report_for_old_version() {
        let report = CompatibilityReport::for_lockfile(&lockfile_with_version(3));
        assert!(!report.compatible);
        let message = report.message();
        assert!(message.contains("incompatible"), "{message}");
        assert!(message.contains("7.0.0"), "{message}");
    }

    // ============================================
    // Unit Tests - BazelVersion
    // ============================================

    #[test]
    fn test_bazel_version_display_and_parse() {
        let version: BazelVersion = "8.1.0".parse().unwrap();
        assert_eq!(version, BazelVersion::new(8, 1, 0));
        assert_eq!(version.to_string(), "8.1.0");
    }

    #[test]
    fn test_bazel_version_rejects_prerelease() {
        assert!("9.0.0-rc1".parse::<BazelVersion>().is_err());
        assert!("9.0".parse::<BazelVersion>().is_err());
    }

    #[test]
    fn test_bazel_version_ordering() {
        assert!(BazelVersion::new(7, 10, 0) > BazelVersion::new(7, 9, 9));
        assert!(BazelVersion::new(8, 0, 0) > BazelVersion::new(7, 99, 99));
    }
}
