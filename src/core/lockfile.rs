//! Lockfile model
//!
//! The lockfile (MODULE.bazel.lock) records which registry files were
//! fetched and their digests, which yanked module versions were allowed
//! anyway, and opaque module extension results and facts, so a second
//! resolution on the same inputs reproduces the same result offline.
//!
//! Maps here are unordered; key order is imposed only when serializing
//! (see [`crate::core::codec`]).

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::core::hasher::{self, DigestForm};
use crate::core::module_key::ModuleKey;
use crate::core::versions::{FormatVersion, CURRENT_LOCKFILE_VERSION};

/// An opaque JSON value kept exactly as it was read
///
/// Extension results and facts are never interpreted. Equality compares
/// the raw text, so two payloads differing only in whitespace are unequal.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Box<RawValue>);

impl Payload {
    /// Wrap JSON text, validating that it is a single JSON value
    pub fn from_json(text: impl Into<String>) -> Result<Self, serde_json::Error> {
        RawValue::from_string(text.into()).map(Self)
    }

    /// Serialize a value into a payload
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::value::to_raw_value(value).map(Self)
    }

    /// Raw JSON text
    pub fn get(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for Payload {}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&self.get()).finish()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

/// Results of one module extension, keyed by evaluation factors
pub type ExtensionResults = HashMap<String, Payload>;

/// Lockfile structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lockfile {
    /// Lockfile format version, kept verbatim even when unknown
    pub version: FormatVersion,

    /// Registry file URL to content digest
    pub registry_file_hashes: HashMap<String, String>,

    /// Allowed yanked versions (`name@version`) to the reason they were allowed
    pub selected_yanked_versions: HashMap<String, String>,

    /// Extension identifier to per-factors results
    pub module_extensions: HashMap<String, ExtensionResults>,

    /// Fact identifier to payload
    pub facts: HashMap<String, Payload>,
}

impl Lockfile {
    /// Create an empty lockfile in the current format version
    pub fn new() -> Self {
        Self::with_version(CURRENT_LOCKFILE_VERSION)
    }

    /// Create an empty lockfile with an explicit format version
    pub fn with_version(version: FormatVersion) -> Self {
        Self {
            version,
            registry_file_hashes: HashMap::new(),
            selected_yanked_versions: HashMap::new(),
            module_extensions: HashMap::new(),
            facts: HashMap::new(),
        }
    }

    /// Whether every map is empty
    pub fn is_empty(&self) -> bool {
        self.registry_file_hashes.is_empty()
            && self.selected_yanked_versions.is_empty()
            && self.module_extensions.is_empty()
            && self.facts.is_empty()
    }

    /// Record the digest of a registry file
    pub fn set_registry_hash(&mut self, url: impl Into<String>, hash: impl Into<String>) {
        self.registry_file_hashes.insert(url.into(), hash.into());
    }

    /// Digest recorded for a registry file
    pub fn registry_hash(&self, url: &str) -> Option<&str> {
        self.registry_file_hashes.get(url).map(String::as_str)
    }

    /// Whether a registry file has a recorded digest
    pub fn has_registry_hash(&self, url: &str) -> bool {
        self.registry_file_hashes.contains_key(url)
    }

    /// Allow a yanked module version, with a justification
    pub fn allow_yanked_version(&mut self, key: &ModuleKey, reason: impl Into<String>) {
        self.selected_yanked_versions
            .insert(key.to_string(), reason.into());
    }

    /// Whether a yanked module version was explicitly allowed
    pub fn is_yanked_version_allowed(&self, key: &ModuleKey) -> bool {
        self.selected_yanked_versions.contains_key(&key.to_string())
    }

    /// Justification recorded for an allowed yanked version
    pub fn yanked_version_reason(&self, key: &ModuleKey) -> Option<&str> {
        self.selected_yanked_versions
            .get(&key.to_string())
            .map(String::as_str)
    }

    /// Record an extension result for one set of evaluation factors
    pub fn set_extension_result(
        &mut self,
        extension: impl Into<String>,
        factors: impl Into<String>,
        result: Payload,
    ) {
        self.module_extensions
            .entry(extension.into())
            .or_default()
            .insert(factors.into(), result);
    }

    /// Extension result recorded for one set of evaluation factors
    pub fn extension_result(&self, extension: &str, factors: &str) -> Option<&Payload> {
        self.module_extensions
            .get(extension)
            .and_then(|results| results.get(factors))
    }

    /// Record a fact
    pub fn set_fact(&mut self, id: impl Into<String>, payload: Payload) {
        self.facts.insert(id.into(), payload);
    }

    /// Fact recorded under an identifier
    pub fn fact(&self, id: &str) -> Option<&Payload> {
        self.facts.get(id)
    }

    /// Digest conventions used by the registry file hashes
    ///
    /// More than one entry means the lockfile mixes raw and prefixed digests.
    pub fn digest_forms(&self) -> BTreeSet<DigestForm> {
        self.registry_file_hashes
            .values()
            .map(|digest| hasher::classify(digest))
            .collect()
    }
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}
