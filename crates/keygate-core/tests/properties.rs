// crates/keygate-core/tests/properties.rs
// ============================================================================
// Module: Property Tests
// Description: Property-based coverage for hashing, roles, and routing.
// Purpose: Validate invariants over generated inputs rather than fixed cases.
// Dependencies: keygate-core, proptest
// ============================================================================

//! ## Overview
//! Property-based tests over credential hashing, role label normalization,
//! and route template matching.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use keygate_core::Role;
use keygate_core::core::hashing::strip_bearer;
use keygate_core::hash_credential;
use keygate_core::route_template_matches;
use proptest::prelude::*;

#[test]
fn legacy_role_labels_normalize_to_canonical_roles() {
    assert_eq!(Role::from_label("admin"), Some(Role::ProxyAdmin));
    assert_eq!(Role::from_label("app_user"), Some(Role::InternalUser));
    assert_eq!(Role::from_label("app_owner"), Some(Role::InternalUser));
}

proptest! {
    #[test]
    fn credential_hash_is_64_lowercase_hex(raw in ".*") {
        let digest = hash_credential(&raw);
        let hex = digest.as_str();
        prop_assert_eq!(hex.len(), 64);
        prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn credential_hash_is_deterministic(raw in ".*") {
        prop_assert_eq!(hash_credential(&raw), hash_credential(&raw));
    }

    #[test]
    fn bearer_prefix_never_reaches_the_digest(secret in "[A-Za-z0-9-]{1,64}") {
        let with_prefix = format!("Bearer {secret}");
        prop_assert_eq!(strip_bearer(&with_prefix), secret.as_str());
        prop_assert_eq!(
            hash_credential(strip_bearer(&with_prefix)),
            hash_credential(&secret)
        );
    }

    #[test]
    fn canonical_role_labels_round_trip(role in prop_oneof![
        Just(Role::ProxyAdmin),
        Just(Role::ProxyAdminViewer),
        Just(Role::InternalUser),
        Just(Role::InternalUserViewer),
    ]) {
        let label = role.as_str();
        prop_assert_eq!(Role::from_label(label), Some(role));
    }

    #[test]
    fn unknown_role_labels_never_normalize(label in "[a-z_]{1,24}") {
        prop_assume!(![
            "proxy_admin",
            "proxy_admin_viewer",
            "internal_user",
            "internal_user_viewer",
            "admin",
            "app_user",
            "app_owner",
        ]
        .contains(&label.as_str()));
        prop_assert_eq!(Role::from_label(&label), None);
    }

    #[test]
    fn literal_templates_match_exactly_themselves(
        segments in proptest::collection::vec("[a-z0-9]{1,12}", 1..5)
    ) {
        let route = format!("/{}", segments.join("/"));
        prop_assert!(route_template_matches(&route, &route));
        let longer = format!("{route}/extra");
        prop_assert!(!route_template_matches(&route, &longer));
    }

    #[test]
    fn param_segments_match_any_nonempty_value(value in "[A-Za-z0-9_-]{1,32}") {
        let route = format!("/key/{value}/regenerate");
        let template = "/key/{key_id}/regenerate";
        prop_assert!(route_template_matches(template, &route));
    }
}
