// crates/keygate-core/src/core/hashing.rs
// ============================================================================
// Module: Keygate Credential Hashing
// Description: One-way digest of bearer secrets for cache keying.
// Purpose: Keep raw secrets out of the cache and out of telemetry.
// Dependencies: crate::core::identifiers, sha2
// ============================================================================

//! ## Overview
//! Credentials are keyed in the cache by the lowercase-hex SHA-256 digest of
//! the bearer secret, never by the secret itself. The digest is deterministic
//! so repeated presentations of the same secret hit the same cache entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

use crate::core::identifiers::CredentialHash;

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Lowercase hex alphabet for digest rendering.
const HEX_ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Strips an HTTP `Bearer ` scheme prefix from a credential header value.
///
/// Values without the prefix are returned unchanged; surrounding whitespace
/// is trimmed either way.
#[must_use]
pub fn strip_bearer(raw: &str) -> &str {
    raw.strip_prefix("Bearer ").unwrap_or(raw).trim()
}

/// Computes the canonical one-way digest of a bearer secret.
///
/// The `Bearer ` prefix is stripped first so header values and bare secrets
/// hash identically.
#[must_use]
pub fn hash_credential(raw: &str) -> CredentialHash {
    let digest = Sha256::digest(strip_bearer(raw).as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push(char::from(HEX_ALPHABET[usize::from(byte >> 4)]));
        hex.push(char::from(HEX_ALPHABET[usize::from(byte & 0x0f)]));
    }
    CredentialHash::from_hex(hex)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
