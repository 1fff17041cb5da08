// crates/keygate-core/src/guards/routes.rs
// ============================================================================
// Module: Keygate Route Authorization Guard
// Description: Role-to-route matrices and route-template matching.
// Purpose: Gate operational endpoints by role, channel, and global allow-list.
// Dependencies: crate::core::{request, roles}, crate::error
// ============================================================================

//! ## Overview
//! Route authorization is two independent, statically defined matrices keyed
//! by canonical role: the API matrix governs programmatic bearer-key callers
//! and the UI matrix governs console-originated calls. One shared
//! route-template matcher serves both matrices and the optional global
//! allow-list so the matching semantics cannot drift apart: literal segments
//! must match exactly and `{param}` segments match any single non-empty
//! segment.
//!
//! The global allow-list, when configured, is evaluated before any role
//! matrix: a route outside it is rejected regardless of role. A route the
//! applicable matrix does not list is rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::request::Channel;
use crate::core::roles::Role;
use crate::error::AdmissionError;

// ============================================================================
// SECTION: Route Groups
// ============================================================================

/// LLM passthrough routes; every role may call the model surface with a
/// valid key.
pub const LLM_ROUTES: &[&str] = &[
    "/chat/completions",
    "/completions",
    "/embeddings",
    "/models",
    "/v1/chat/completions",
    "/v1/completions",
    "/v1/embeddings",
    "/v1/models",
];

/// Key management routes.
pub const KEY_MANAGEMENT_ROUTES: &[&str] = &[
    "/key/generate",
    "/key/update",
    "/key/delete",
    "/key/info",
    "/key/regenerate",
    "/key/{key_id}/regenerate",
];

/// Team, user, and organization management routes.
pub const MANAGEMENT_ROUTES: &[&str] = &[
    "/team/new",
    "/team/update",
    "/team/delete",
    "/team/info",
    "/user/new",
    "/user/update",
    "/user/delete",
    "/user/info",
    "/organization/new",
    "/organization/member_add",
];

/// Read-only information routes.
pub const INFO_ROUTES: &[&str] = &["/key/info", "/user/info", "/team/info", "/model/info"];

/// Spend reporting routes.
pub const SPEND_ROUTES: &[&str] = &["/spend/logs", "/spend/tags", "/global/spend/logs"];

// ============================================================================
// SECTION: Role Matrices
// ============================================================================

/// API-matrix groups for the administrator role.
const API_PROXY_ADMIN: &[&[&str]] =
    &[LLM_ROUTES, KEY_MANAGEMENT_ROUTES, MANAGEMENT_ROUTES, INFO_ROUTES, SPEND_ROUTES];
/// API-matrix groups for the administrator viewer role.
const API_PROXY_ADMIN_VIEWER: &[&[&str]] = &[LLM_ROUTES, INFO_ROUTES, SPEND_ROUTES];
/// API-matrix groups for the regular user role.
const API_INTERNAL_USER: &[&[&str]] =
    &[LLM_ROUTES, KEY_MANAGEMENT_ROUTES, INFO_ROUTES, SPEND_ROUTES];
/// API-matrix groups for the read-only user role.
const API_INTERNAL_USER_VIEWER: &[&[&str]] = &[LLM_ROUTES, INFO_ROUTES, SPEND_ROUTES];

/// UI-matrix groups for the administrator role.
const UI_PROXY_ADMIN: &[&[&str]] =
    &[LLM_ROUTES, KEY_MANAGEMENT_ROUTES, MANAGEMENT_ROUTES, INFO_ROUTES, SPEND_ROUTES];
/// UI-matrix groups for the administrator viewer role.
const UI_PROXY_ADMIN_VIEWER: &[&[&str]] = &[INFO_ROUTES, SPEND_ROUTES];
/// UI-matrix groups for the regular user role.
const UI_INTERNAL_USER: &[&[&str]] = &[KEY_MANAGEMENT_ROUTES, INFO_ROUTES, SPEND_ROUTES];
/// UI-matrix groups for the read-only user role.
const UI_INTERNAL_USER_VIEWER: &[&[&str]] = &[INFO_ROUTES, SPEND_ROUTES];

/// Route matrix selected by the authentication channel.
///
/// # Invariants
/// - Matrix contents are static; deployments cannot widen a role at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatrix {
    /// Matrix for programmatic bearer-key callers.
    Api,
    /// Matrix for console-originated calls.
    Ui,
}

impl RouteMatrix {
    /// Returns a stable label for the matrix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Ui => "ui",
        }
    }

    /// Selects the matrix for an authentication channel.
    #[must_use]
    pub const fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Api => Self::Api,
            Channel::Ui => Self::Ui,
        }
    }

    /// Returns the route groups a role may call under this matrix.
    #[must_use]
    pub const fn groups(self, role: Role) -> &'static [&'static [&'static str]] {
        match (self, role) {
            (Self::Api, Role::ProxyAdmin) => API_PROXY_ADMIN,
            (Self::Api, Role::ProxyAdminViewer) => API_PROXY_ADMIN_VIEWER,
            (Self::Api, Role::InternalUser) => API_INTERNAL_USER,
            (Self::Api, Role::InternalUserViewer) => API_INTERNAL_USER_VIEWER,
            (Self::Ui, Role::ProxyAdmin) => UI_PROXY_ADMIN,
            (Self::Ui, Role::ProxyAdminViewer) => UI_PROXY_ADMIN_VIEWER,
            (Self::Ui, Role::InternalUser) => UI_INTERNAL_USER,
            (Self::Ui, Role::InternalUserViewer) => UI_INTERNAL_USER_VIEWER,
        }
    }
}

// ============================================================================
// SECTION: Template Matching
// ============================================================================

/// Returns true when a template segment is a `{param}` wildcard.
fn is_param_segment(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Matches a route against a template, segment by segment.
///
/// Literal segments must match exactly; `{param}` segments match any single
/// non-empty segment. Segment counts must agree.
#[must_use]
pub fn route_template_matches(template: &str, route: &str) -> bool {
    let mut template_segments = template.trim_matches('/').split('/');
    let mut route_segments = route.trim_matches('/').split('/');
    loop {
        match (template_segments.next(), route_segments.next()) {
            (Some(expected), Some(actual)) => {
                let matches = if is_param_segment(expected) {
                    !actual.is_empty()
                } else {
                    expected == actual
                };
                if !matches {
                    return false;
                }
            }
            (None, None) => return true,
            (Some(_), None) | (None, Some(_)) => return false,
        }
    }
}

/// Returns true when any template in the list matches the route.
fn any_template_matches<'a, I>(templates: I, route: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    templates.into_iter().any(|template| route_template_matches(template, route))
}

// ============================================================================
// SECTION: Route Checks
// ============================================================================

/// Returns true when a role may call a route under the given matrix.
#[must_use]
pub fn is_route_allowed(matrix: RouteMatrix, role: Role, route: &str) -> bool {
    matrix
        .groups(role)
        .iter()
        .any(|group| any_template_matches(group.iter().copied(), route))
}

/// Enforces the role matrix for a route.
///
/// # Errors
///
/// Returns [`AdmissionError::ForbiddenRoute`] naming the route when the
/// applicable matrix does not list it for the role.
pub fn check_route(matrix: RouteMatrix, role: Role, route: &str) -> Result<(), AdmissionError> {
    if is_route_allowed(matrix, role, route) {
        Ok(())
    } else {
        Err(AdmissionError::ForbiddenRoute {
            route: route.to_string(),
        })
    }
}

/// Enforces the global route allow-list, when one is configured.
///
/// Evaluated before any role matrix; an unconfigured list (`None`) imposes no
/// restriction.
///
/// # Errors
///
/// Returns [`AdmissionError::ForbiddenRoute`] naming the route when a
/// configured allow-list does not contain it.
pub fn check_allowed_routes(
    allowed_routes: Option<&[String]>,
    route: &str,
) -> Result<(), AdmissionError> {
    let Some(allowed) = allowed_routes else {
        return Ok(());
    };
    if any_template_matches(allowed.iter().map(String::as_str), route) {
        Ok(())
    } else {
        Err(AdmissionError::ForbiddenRoute {
            route: route.to_string(),
        })
    }
}
