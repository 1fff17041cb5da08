// crates/keygate-core/src/guards/network.rs
// ============================================================================
// Module: Keygate Network Policy Guard
// Description: Source-IP allow-listing with optional proxy-header trust.
// Purpose: Decide whether the caller's address may reach the gateway at all.
// Dependencies: crate::core::request, crate::error
// ============================================================================

//! ## Overview
//! The allow-list has three states: absent means no restriction, an empty
//! list denies every caller, and a non-empty list admits exact matches only.
//! The caller address comes from the transport unless `use_x_forwarded_for`
//! opts into the forwarding header, in which case the header value is used in
//! its place (not as a fallback). Some gateways instead fall back to the
//! transport address when the header is missing; here a trusted-but-absent
//! header denies, since a deployment that opted into header trust is behind
//! a proxy and a headerless request did not come through it. A request whose
//! address cannot be determined is never a member of a configured list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::request::AdmissionRequest;
use crate::core::request::FORWARDED_FOR_HEADER;
use crate::error::AdmissionError;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of the network policy check.
///
/// # Invariants
/// - `allowed` is the authoritative decision; `reason` is telemetry only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpDecision {
    /// Whether the caller's address passes the policy.
    pub allowed: bool,
    /// Human-readable reason for telemetry and rejection rendering.
    pub reason: String,
}

// ============================================================================
// SECTION: Network Policy
// ============================================================================

/// Derives the caller address the policy should judge.
fn derive_client_ip<'a>(
    request: &'a AdmissionRequest,
    use_x_forwarded_for: bool,
) -> Option<&'a str> {
    if use_x_forwarded_for {
        request.header(FORWARDED_FOR_HEADER)
    } else {
        request.client_ip.as_deref()
    }
}

/// Evaluates the source-IP allow-list policy for a request.
#[must_use]
pub fn check_client_ip(
    allowed_ips: Option<&[String]>,
    request: &AdmissionRequest,
    use_x_forwarded_for: bool,
) -> IpDecision {
    let Some(allowed) = allowed_ips else {
        return IpDecision {
            allowed: true,
            reason: "no ip restriction configured".to_string(),
        };
    };
    let Some(client_ip) = derive_client_ip(request, use_x_forwarded_for) else {
        return IpDecision {
            allowed: false,
            reason: "client ip could not be determined".to_string(),
        };
    };
    if allowed.is_empty() {
        return IpDecision {
            allowed: false,
            reason: "ip allow-list is empty: all callers are rejected".to_string(),
        };
    }
    if allowed.iter().any(|candidate| candidate == client_ip) {
        IpDecision {
            allowed: true,
            reason: format!("client ip {client_ip} is in the allow-list"),
        }
    } else {
        IpDecision {
            allowed: false,
            reason: format!("client ip {client_ip} is not in the allow-list"),
        }
    }
}

/// Enforces the source-IP policy, rejecting with a typed error.
///
/// # Errors
///
/// Returns [`AdmissionError::IpNotAllowed`] carrying the rejection reason
/// when the caller's address fails the policy.
pub fn enforce_client_ip(
    allowed_ips: Option<&[String]>,
    request: &AdmissionRequest,
    use_x_forwarded_for: bool,
) -> Result<(), AdmissionError> {
    let decision = check_client_ip(allowed_ips, request, use_x_forwarded_for);
    if decision.allowed {
        Ok(())
    } else {
        Err(AdmissionError::IpNotAllowed {
            reason: decision.reason,
        })
    }
}
