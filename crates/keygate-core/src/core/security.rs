// crates/keygate-core/src/core/security.rs
// ============================================================================
// Module: Keygate Security Helpers
// Description: Constant-time comparison utilities for secret material.
// Purpose: Provide reusable, side-channel resistant comparisons.
// Dependencies: subtle
// ============================================================================

//! ## Overview
//! Exposes constant-time equality helpers for secret values such as bearer
//! credentials and administrative secrets. Membership checks over secret
//! sets visit every candidate so the match position does not shape latency.
//!
//! Security posture: minimize timing side-channels when comparing secret
//! inputs; response latency must not act as an oracle for secret content.

use subtle::ConstantTimeEq;

// ============================================================================
// SECTION: Constant-Time Comparisons
// ============================================================================

/// Compares two byte slices in constant time.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// Tests membership of a presented secret in a secret set.
///
/// Every candidate is compared; there is no early exit on a match, so the
/// position of the matching entry does not shape latency.
#[must_use]
pub fn constant_time_contains(secrets: &[String], presented: &str) -> bool {
    secrets
        .iter()
        .fold(false, |matched, secret| matched | constant_time_eq_str(secret, presented))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
