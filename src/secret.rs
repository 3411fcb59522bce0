//! Write-only content reconciliation.
//!
//! Certificate and key content is sent once and never echoed back by the
//! vendor. State keeps a SHA-256 digest of the last known plaintext instead
//! of the plaintext itself, and a digest found in state is never re-submitted
//! as new content.

use sha2::{Digest, Sha256};

/// Length of a hex encoded SHA-256 digest.
pub const DIGEST_LEN: usize = 64;

/// Whether `content` is shaped like a stored digest: exactly 64 hex characters.
pub fn is_digest(content: &str) -> bool {
    content.len() == DIGEST_LEN && content.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Lowercase hex SHA-256 of `content`.
pub fn digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// The value persisted in state for a piece of write-only content.
///
/// Already digested content passes through unchanged so repeated cycles are
/// stable.
pub fn state_value(content: &str) -> String {
    if is_digest(content) {
        content.to_string()
    } else {
        digest(content)
    }
}

/// The content to submit to the vendor, if any.
///
/// Empty content and digests read back from state are not new material.
pub fn submitted_content(content: &str) -> Option<String> {
    if content.is_empty() || is_digest(content) {
        None
    } else {
        Some(content.to_string())
    }
}

/// Prefer the previously known secret over whatever the vendor returned.
pub(crate) fn carry_forward(prior: Option<&str>, returned: Option<&str>) -> String {
    match prior {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => returned.unwrap_or_default().to_string(),
    }
}
