//! Building a lockfile from resolution results
//!
//! The resolver hands over one record per resolved module. Each record
//! with module file content contributes a registry file hash and, if the
//! version is yanked, an allowed-yanked entry. Records without content are
//! skipped entirely.

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::config::urls::DEFAULT_REGISTRY;
use crate::core::hasher;
use crate::core::lockfile::Lockfile;
use crate::core::module_key::ModuleKey;

/// One resolved module as reported by the resolver
///
/// Read from JSON with camelCase field names; `moduleFileContent` is the
/// MODULE.bazel text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResolution {
    /// Module name
    pub name: String,
    /// Selected version
    pub version: String,
    /// Registry the module came from; empty means the default registry
    #[serde(default)]
    pub registry_url: String,
    /// Raw MODULE.bazel content fetched from the registry
    #[serde(default, deserialize_with = "module_file_text")]
    pub module_file_content: Vec<u8>,
    /// Whether the registry marks this version as yanked
    #[serde(default)]
    pub is_yanked: bool,
    /// Registry-provided yank reason
    #[serde(default)]
    pub yank_reason: String,
}

fn module_file_text<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(String::into_bytes)
}

impl ModuleResolution {
    /// Module key of this resolution
    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(self.name.clone(), self.version.clone())
    }
}

/// URL of a module's MODULE.bazel file in a registry
///
/// A trailing slash on the registry is dropped; an empty registry means
/// `default_registry`.
pub fn module_file_url(registry_url: &str, default_registry: &str, name: &str, version: &str) -> String {
    let registry = if registry_url.is_empty() {
        default_registry
    } else {
        registry_url
    };
    let registry = registry.strip_suffix('/').unwrap_or(registry);
    format!("{registry}/modules/{name}/{version}/MODULE.bazel")
}

/// Build a lockfile from resolution results using the public registry as default
pub fn from_resolution(resolutions: &[ModuleResolution]) -> Lockfile {
    from_resolution_with_registry(resolutions, DEFAULT_REGISTRY)
}

/// Build a lockfile from resolution results
pub fn from_resolution_with_registry(
    resolutions: &[ModuleResolution],
    default_registry: &str,
) -> Lockfile {
    let mut lockfile = Lockfile::new();

    for resolution in resolutions {
        if resolution.module_file_content.is_empty() {
            if resolution.is_yanked {
                warn!(
                    "No module file content for yanked module {}; not recording it",
                    resolution.key()
                );
            } else {
                debug!("No module file content for {}; skipping", resolution.key());
            }
            continue;
        }

        let url = module_file_url(
            &resolution.registry_url,
            default_registry,
            &resolution.name,
            &resolution.version,
        );
        lockfile.set_registry_hash(url, hasher::hash(&resolution.module_file_content));

        if resolution.is_yanked {
            lockfile.allow_yanked_version(&resolution.key(), resolution.yank_reason.clone());
        }
    }

    debug!(
        "Imported {} registry hashes and {} yanked versions from {} resolutions",
        lockfile.registry_file_hashes.len(),
        lockfile.selected_yanked_versions.len(),
        resolutions.len()
    );
    lockfile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(name: &str, version: &str, content: &[u8]) -> ModuleResolution {
        ModuleResolution {
            name: name.to_string(),
            version: version.to_string(),
            module_file_content: content.to_vec(),
            ..ModuleResolution::default()
        }
    }

    #[test]
    fn test_module_file_url() {
        assert_eq!(
            module_file_url("https://example.com/registry/", DEFAULT_REGISTRY, "zlib", "1.3"),
            "https://example.com/registry/modules/zlib/1.3/MODULE.bazel"
        );
        assert_eq!(
            module_file_url("", DEFAULT_REGISTRY, "zlib", "1.3"),
            "https://bcr.bazel.build/modules/zlib/1.3/MODULE.bazel"
        );
    }

    #[test]
    fn test_import_records_hash() {
        let lockfile = from_resolution(&[resolution("zlib", "1.3", b"hello world")]);
        assert_eq!(
            lockfile.registry_hash("https://bcr.bazel.build/modules/zlib/1.3/MODULE.bazel"),
            Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
        );
        assert!(lockfile.selected_yanked_versions.is_empty());
    }

    #[test]
    fn test_import_records_yanked() {
        let mut yanked = resolution("protobuf", "3.19.0", b"module()");
        yanked.is_yanked = true;
        yanked.yank_reason = "CVE-2022-1941".to_string();
        yanked.registry_url = "https://mirror.example.com".to_string();

        let lockfile = from_resolution(&[yanked]);
        assert!(lockfile.has_registry_hash(
            "https://mirror.example.com/modules/protobuf/3.19.0/MODULE.bazel"
        ));
        assert_eq!(
            lockfile.yanked_version_reason(&ModuleKey::new("protobuf", "3.19.0")),
            Some("CVE-2022-1941")
        );
    }

    #[test]
    fn test_import_skips_empty_content_even_if_yanked() {
        let mut yanked = resolution("protobuf", "3.19.0", b"");
        yanked.is_yanked = true;
        yanked.yank_reason = "bad".to_string();

        let lockfile = from_resolution(&[yanked, resolution("zlib", "1.3", b"")]);
        assert!(lockfile.is_empty());
    }

    #[test]
    fn test_resolution_from_json() {
        let resolutions: Vec<ModuleResolution> = serde_json::from_str(
            r#"[
                {"name": "zlib", "version": "1.3.1", "moduleFileContent": "hello world"},
                {"name": "protobuf", "version": "3.19.0", "registryUrl": "https://mirror.example.com",
                 "moduleFileContent": "module()", "isYanked": true, "yankReason": "CVE"}
            ]"#,
        )
        .unwrap();

        assert_eq!(resolutions[0].module_file_content, b"hello world");
        assert!(resolutions[0].registry_url.is_empty());
        assert!(!resolutions[0].is_yanked);
        assert_eq!(resolutions[1].registry_url, "https://mirror.example.com");
        assert!(resolutions[1].is_yanked);
        assert_eq!(resolutions[1].yank_reason, "CVE");
    }

    #[test]
    fn test_import_custom_default_registry() {
        let lockfile = from_resolution_with_registry(
            &[resolution("zlib", "1.3", b"x")],
            "https://registry.internal/",
        );
        assert!(lockfile.has_registry_hash("https://registry.internal/modules/zlib/1.3/MODULE.bazel"));
    }
}
