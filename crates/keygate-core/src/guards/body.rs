// crates/keygate-core/src/guards/body.rs
// ============================================================================
// Module: Keygate Body Screener
// Description: Top-level request-body inspection for prohibited parameters.
// Purpose: Stop endpoint-override parameters before any downstream use.
// Dependencies: crate::error, serde_json
// ============================================================================

//! ## Overview
//! Certain body parameters would let a caller redirect the gateway's
//! outbound provider calls to an arbitrary endpoint and exfiltrate the
//! gateway's own credentials. The screener rejects any request whose
//! top-level body mapping carries one of those keys, before budget or
//! provider logic runs, so no spend is ever attributed to a rejected call.
//!
//! A body that is absent, empty, or not a JSON object passes untouched; the
//! screener judges only the top-level mapping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::error::AdmissionError;

// ============================================================================
// SECTION: Denylist
// ============================================================================

/// Top-level body keys that are never accepted from callers.
///
/// Both spellings override the outbound provider endpoint.
pub const PROHIBITED_BODY_KEYS: &[&str] = &["api_base", "base_url"];

// ============================================================================
// SECTION: Screening
// ============================================================================

/// Screens the raw request body for prohibited top-level keys.
///
/// # Errors
///
/// Returns [`AdmissionError::ProhibitedParameter`] naming the offending key
/// when the top-level mapping contains a denylisted parameter.
pub fn screen_body(body: Option<&[u8]>) -> Result<(), AdmissionError> {
    let Some(bytes) = body else {
        return Ok(());
    };
    if bytes.is_empty() {
        return Ok(());
    }
    let Ok(value) = serde_json::from_slice::<Value>(bytes) else {
        // Unparseable bodies carry no top-level mapping to screen; the
        // downstream handler owns rejecting malformed payloads.
        return Ok(());
    };
    let Some(object) = value.as_object() else {
        return Ok(());
    };
    for key in PROHIBITED_BODY_KEYS {
        if object.contains_key(*key) {
            return Err(AdmissionError::ProhibitedParameter {
                key: (*key).to_string(),
            });
        }
    }
    Ok(())
}
