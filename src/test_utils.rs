//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::lockfile::{Lockfile, Payload};
    use crate::core::module_key::ModuleKey;

    /// Generate a valid module name (lowercase alphanumeric with underscores)
    pub fn module_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,20}"
    }

    /// Generate a valid semver version string
    pub fn semver_version() -> impl Strategy<Value = String> {
        (0u32..100, 0u32..100, 0u32..100)
            .prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}"))
    }

    /// Generate a valid SHA256 hash (64 hex characters)
    pub fn sha256_hash() -> impl Strategy<Value = String> {
        "[0-9a-f]{64}"
    }

    /// Generate a registry MODULE.bazel URL
    pub fn registry_url() -> impl Strategy<Value = String> {
        (
            prop_oneof![
                Just("https://bcr.bazel.build".to_string()),
                Just("https://registry.example.com/bcr".to_string()),
            ],
            module_name(),
            semver_version(),
        )
            .prop_map(|(registry, name, version)| {
                format!("{registry}/modules/{name}/{version}/MODULE.bazel")
            })
    }

    /// Generate an opaque JSON payload, including one with odd spacing
    pub fn payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            any::<i64>().prop_map(|n| Payload::from_value(&n).unwrap()),
            "[a-z ]{0,10}".prop_map(|s| Payload::from_value(&s).unwrap()),
            Just(Payload::from_json(r#"{"z": [1, 2],  "a": null}"#).unwrap()),
        ]
    }

    /// Generate a lockfile with a few entries in every map
    pub fn lockfile() -> impl Strategy<Value = Lockfile> {
        (
            -5i64..40,
            prop::collection::hash_map(registry_url(), sha256_hash(), 0..5),
            prop::collection::hash_map(
                (module_name(), prop_oneof![semver_version(), Just(String::new())]),
                "[a-zA-Z ]{0,20}",
                0..4,
            ),
            prop::collection::hash_map(
                "[a-z_/:%@]{1,20}",
                prop::collection::hash_map("[a-z0-9]{1,8}", payload(), 0..3),
                0..3,
            ),
            prop::collection::hash_map("[a-z_]{1,10}", payload(), 0..3),
        )
            .prop_map(|(version, hashes, yanked, extensions, facts)| {
                let mut lockfile = Lockfile::with_version(version);
                lockfile.registry_file_hashes = hashes;
                for ((name, version), reason) in yanked {
                    lockfile.allow_yanked_version(&ModuleKey::new(name, version), reason);
                }
                lockfile.module_extensions = extensions;
                lockfile.facts = facts;
                lockfile
            })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_module_name_generator(name in module_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(!name.contains('@'));
        }

        #[test]
        fn test_sha256_hash_generator(hash in sha256_hash()) {
            prop_assert_eq!(hash.len(), 64);
            prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_registry_url_generator(url in registry_url()) {
            prop_assert!(url.starts_with("https://"));
            prop_assert!(url.ends_with("/MODULE.bazel"));
        }
    }
}
