// crates/keygate-core/src/error.rs
// ============================================================================
// Module: Keygate Admission Errors
// Description: Typed rejection taxonomy for the admission pipeline.
// Purpose: Make every rejection an explicit, machine-readable value.
// Dependencies: crate::core, crate::guards, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! Every guard stage rejects with its specific [`AdmissionError`] variant and
//! the orchestrator propagates it unchanged; nothing is caught or downgraded
//! on the way to the boundary. All variants are fatal to the current request
//! and none are retried by this layer. The calling framework owns the mapping
//! to transport-level status codes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::TeamId;
use crate::guards::budget::BudgetTier;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Admission Errors
// ============================================================================

/// Typed rejection raised by an admission stage.
///
/// # Invariants
/// - Variants are stable for programmatic handling; messages carry enough
///   detail (offending key, route, limit tier) for precise rendering.
/// - Messages never contain raw credentials.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    /// Credential does not resolve to any known identity.
    #[error("invalid credential: no matching key record")]
    Authentication,
    /// The authoritative team record marks the entity blocked.
    #[error("team {team_id} is blocked from making requests")]
    BlockedEntity {
        /// Team whose authoritative record is blocked.
        team_id: TeamId,
    },
    /// Spend exceeds the applicable budget limit.
    #[error("budget exceeded: {tier} spend {spend} is over the limit {limit}")]
    BudgetExceeded {
        /// Budget tier that was exceeded.
        tier: BudgetTier,
        /// Current spend at that tier.
        spend: f64,
        /// Configured limit at that tier.
        limit: f64,
    },
    /// Source IP is absent from a configured allow-list.
    #[error("access forbidden: {reason}")]
    IpNotAllowed {
        /// Human-readable rejection reason for telemetry.
        reason: String,
    },
    /// Route is not present in the applicable role matrix or allow-list.
    #[error("route {route} is not allowed for this caller")]
    ForbiddenRoute {
        /// Route that was requested.
        route: String,
    },
    /// Request body contains a denylisted top-level key.
    #[error("{key} is not allowed in request body")]
    ProhibitedParameter {
        /// Offending body key.
        key: String,
    },
    /// The durable store failed on the admission read path.
    #[error("admission store failure: {0}")]
    Store(#[from] StoreError),
}

impl AdmissionError {
    /// Returns a stable machine-readable kind label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication_error",
            Self::BlockedEntity {
                ..
            } => "blocked_entity",
            Self::BudgetExceeded {
                ..
            } => "budget_exceeded",
            Self::IpNotAllowed {
                ..
            } => "ip_not_allowed",
            Self::ForbiddenRoute {
                ..
            } => "forbidden_route",
            Self::ProhibitedParameter {
                ..
            } => "prohibited_parameter",
            Self::Store(_) => "store_error",
        }
    }
}
