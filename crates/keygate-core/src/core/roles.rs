// crates/keygate-core/src/core/roles.rs
// ============================================================================
// Module: Keygate Roles
// Description: Canonical gateway roles and legacy-alias normalization.
// Purpose: Provide a closed role set behind a total alias mapping.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Roles form a fixed, closed set. Records written by older gateway versions
//! may still carry deprecated labels (`app_user`, `app_owner`, `admin`);
//! those aliases map one-to-one onto canonical roles at deserialization and
//! at [`Role::from_label`]. The mapping is total over the known label set and
//! idempotent: normalizing a canonical label yields the same role.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Role
// ============================================================================

/// Canonical gateway role after legacy-alias normalization.
///
/// # Invariants
/// - Variants are stable for serialization and route-matrix lookup.
/// - Legacy aliases never survive resolution; downstream code sees only
///   canonical roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access to the gateway.
    #[serde(alias = "admin")]
    ProxyAdmin,
    /// Read-only administrative access.
    ProxyAdminViewer,
    /// Regular gateway user with self-service key management.
    #[serde(alias = "app_user", alias = "app_owner")]
    InternalUser,
    /// Read-only gateway user.
    InternalUserViewer,
}

impl Role {
    /// Returns the canonical label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProxyAdmin => "proxy_admin",
            Self::ProxyAdminViewer => "proxy_admin_viewer",
            Self::InternalUser => "internal_user",
            Self::InternalUserViewer => "internal_user_viewer",
        }
    }

    /// Normalizes a canonical or legacy role label.
    ///
    /// Returns `None` for labels outside the known set; callers treat an
    /// unknown label as an unresolved identity, never as a default role.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "proxy_admin" | "admin" => Some(Self::ProxyAdmin),
            "proxy_admin_viewer" => Some(Self::ProxyAdminViewer),
            "internal_user" | "app_user" | "app_owner" => Some(Self::InternalUser),
            "internal_user_viewer" => Some(Self::InternalUserViewer),
            _ => None,
        }
    }

    /// Returns true for the highest-privilege role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::ProxyAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
