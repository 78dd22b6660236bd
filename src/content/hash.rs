//! Content digests for near-duplicate detection.
//!
//! Two bodies that differ only in case, whitespace, or blank-line layout
//! hash identically: the canonical form is lowercased with every whitespace
//! run collapsed to a single space. Empty canonical text yields an empty
//! digest, the "nothing to hash" sentinel that is never stored.

use sha2::{Digest, Sha256};

use crate::content::normalize::normalize_whitespace;

/// Compute the dedup digest of `content` as a lowercase hex SHA-256, or the
/// empty string when there is no content to hash.
pub fn content_hash(content: &str) -> String {
    let normalized = normalize_whitespace(content);
    let canonical: String = normalized
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if canonical.is_empty() {
        return String::new();
    }
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{digest:x}")
}
