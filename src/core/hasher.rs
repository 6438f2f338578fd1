//! Content integrity digests
//!
//! Registry files are recorded by their SHA-256 digest, hex encoded in
//! lowercase without an algorithm tag. Some producers write the same
//! digest as `sha256:<hex>`; [`classify`] tells the two apart so callers
//! can report lockfiles mixing both conventions.

use sha2::{Digest, Sha256};

/// Algorithm tag used by prefixed digests
pub const SHA256_PREFIX: &str = "sha256:";

/// Compute the SHA-256 digest of data as lowercase hex
pub fn hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the digest in `sha256:<hex>` form
pub fn hash_prefixed(data: &[u8]) -> String {
    format!("{SHA256_PREFIX}{}", hash(data))
}

/// Check data against an expected digest
///
/// Comparison is exact: no case folding, no prefix stripping.
pub fn verify(data: &[u8], expected: &str) -> bool {
    hash(data) == expected
}

/// Shape of a stored digest string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestForm {
    /// 64 lowercase hex characters
    RawHex,
    /// `sha256:` followed by 64 lowercase hex characters
    Prefixed,
    /// Anything else
    Unknown,
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Classify a digest string
pub fn classify(digest: &str) -> DigestForm {
    if is_sha256_hex(digest) {
        DigestForm::RawHex
    } else if digest
        .strip_prefix(SHA256_PREFIX)
        .is_some_and(is_sha256_hex)
    {
        DigestForm::Prefixed
    } else {
        DigestForm::Unknown
    }
}
