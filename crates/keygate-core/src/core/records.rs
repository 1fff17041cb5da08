// crates/keygate-core/src/core/records.rs
// ============================================================================
// Module: Keygate Authorization Records
// Description: Authorization context, user, and team record shapes.
// Purpose: Fixed-shape records for credential resolution and guard evaluation.
// Dependencies: crate::core::{identifiers, roles, time}, serde, serde_json
// ============================================================================

//! ## Overview
//! These records mirror the durable store's canonical entities. The store
//! owns them; this layer holds read-only cached copies that may go stale.
//! The [`AuthorizationContext`] is assembled per request, is immutable for
//! the lifetime of that request once reconciled, and is discarded afterwards.
//!
//! Spend figures are `f64` to match the store's accounting columns; budget
//! comparisons are strict (`spend > limit` exceeds, equality does not).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::CredentialHash;
use crate::core::identifiers::TeamId;
use crate::core::identifiers::UserId;
use crate::core::roles::Role;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Authorization Context
// ============================================================================

/// Resolved per-request identity and authorization attributes.
///
/// # Invariants
/// - `token` is always a digest; the raw bearer secret is never carried.
/// - References exactly one user and at most one team by identifier; lookups
///   go through the cache, never ownership.
/// - `team_*` fields are snapshots embedded when the key record was cached;
///   [`crate::reconcile`] decides whether they are authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Credential hash identifying the key record.
    pub token: CredentialHash,
    /// User the credential belongs to, when any.
    pub user_id: Option<UserId>,
    /// Team the credential belongs to, when any.
    pub team_id: Option<TeamId>,
    /// Canonical role attached to the credential.
    pub role: Role,
    /// Spend accumulated by this key.
    #[serde(default)]
    pub spend: f64,
    /// Key-level budget; `None` means unlimited.
    pub max_budget: Option<f64>,
    /// Team spend snapshot embedded at caching time.
    #[serde(default)]
    pub team_spend: f64,
    /// Team budget snapshot; `None` means unlimited.
    pub team_max_budget: Option<f64>,
    /// Team blocked-flag snapshot embedded at caching time.
    #[serde(default)]
    pub team_blocked: bool,
    /// Freshness stamp for staleness comparison against independent records.
    pub last_refreshed_at: Timestamp,
    /// Models this key may call; empty means no model restriction.
    #[serde(default)]
    pub models: Vec<String>,
    /// Opaque metadata handed to downstream request handling.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl AuthorizationContext {
    /// Builds the context for an administrative-secret fast path.
    ///
    /// Administrative resolution bypasses cache and store entirely, so the
    /// context carries no user, team, or budget attributes.
    #[must_use]
    pub fn for_admin(token: CredentialHash, refreshed_at: Timestamp) -> Self {
        Self {
            token,
            user_id: None,
            team_id: None,
            role: Role::ProxyAdmin,
            spend: 0.0,
            max_budget: None,
            team_spend: 0.0,
            team_max_budget: None,
            team_blocked: false,
            last_refreshed_at: refreshed_at,
            models: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

// ============================================================================
// SECTION: User Record
// ============================================================================

/// Canonical user entity owned by the durable store.
///
/// # Invariants
/// - Cached copies are read-only and may go stale; the store is authoritative.
/// - Rate limits and per-model maps are carried as data for downstream
///   consumers; the admission layer does not enforce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User identifier.
    pub user_id: UserId,
    /// Spend accumulated across the user's keys.
    #[serde(default)]
    pub spend: f64,
    /// Personal budget; `None` means unlimited.
    pub max_budget: Option<f64>,
    /// Canonical role for the user.
    pub role: Role,
    /// Per-model budget limits.
    #[serde(default)]
    pub model_max_budget: BTreeMap<String, f64>,
    /// Per-model spend figures.
    #[serde(default)]
    pub model_spend: BTreeMap<String, f64>,
    /// Tokens-per-minute limit, when configured.
    pub tpm_limit: Option<u64>,
    /// Requests-per-minute limit, when configured.
    pub rpm_limit: Option<u64>,
    /// Organizations the user belongs to (opaque identifiers).
    #[serde(default)]
    pub organization_memberships: Vec<String>,
}

// ============================================================================
// SECTION: Team Record
// ============================================================================

/// Canonical team entity owned by the durable store.
///
/// # Invariants
/// - `last_refreshed_at` decides authority against embedded team snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Team identifier.
    pub team_id: TeamId,
    /// Whether the team is blocked from making calls.
    #[serde(default)]
    pub blocked: bool,
    /// Spend accumulated across the team's keys.
    #[serde(default)]
    pub spend: f64,
    /// Team budget; `None` means unlimited.
    pub max_budget: Option<f64>,
    /// Freshness stamp for staleness comparison.
    pub last_refreshed_at: Timestamp,
}
