// crates/keygate-core/src/lib.rs
// ============================================================================
// Module: Keygate Core Library
// Description: Request-admission engine for a multi-tenant LLM API gateway.
// Purpose: Resolve credentials and run the fail-closed admission pipeline.
// Dependencies: async-trait, serde, serde_json, sha2, subtle, thiserror, time
// ============================================================================

//! ## Overview
//! Keygate Core is the request-admission layer that sits in front of every
//! provider call the gateway makes. For each inbound request it resolves the
//! presented bearer credential to an [`AuthorizationContext`], reconciles
//! stale team state, and runs the guard pipeline (network policy, route
//! authorization, body screening, budgets) in a fixed order.
//! Invariants:
//! - Every rejection is a typed [`AdmissionError`] value; no partial
//!   admission is ever granted.
//! - Raw credentials never enter the cache; entries are keyed by
//!   [`CredentialHash`].
//! - Guard stages fail closed on missing or ambiguous data.
//!
//! Security posture: all request inputs (headers, body, client address) are
//! untrusted; the admission pipeline is the trust boundary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod admission;
pub mod cache;
pub mod core;
pub mod error;
pub mod guards;
pub mod interfaces;
pub mod reconcile;
pub mod resolver;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use admission::Admission;
pub use admission::AdmissionEngine;
pub use admission::AdmissionEngineBuilder;
pub use admission::AdmissionSettings;
pub use admission::EngineBuildError;
pub use cache::AuthCache;
pub use cache::CacheEntry;
pub use cache::CacheKey;
pub use cache::CacheRecord;
pub use core::hashing::hash_credential;
pub use core::identifiers::CredentialHash;
pub use core::identifiers::TeamId;
pub use core::identifiers::UserId;
pub use core::records::AuthorizationContext;
pub use core::records::TeamRecord;
pub use core::records::UserRecord;
pub use core::request::AdmissionRequest;
pub use core::request::Channel;
pub use core::roles::Role;
pub use core::security::constant_time_contains;
pub use core::security::constant_time_eq;
pub use core::security::constant_time_eq_str;
pub use core::time::Timestamp;
pub use error::AdmissionError;
pub use guards::body::PROHIBITED_BODY_KEYS;
pub use guards::body::screen_body;
pub use guards::budget::BudgetTier;
pub use guards::budget::check_budget;
pub use guards::network::IpDecision;
pub use guards::network::check_client_ip;
pub use guards::routes::RouteMatrix;
pub use guards::routes::is_route_allowed;
pub use guards::routes::route_template_matches;
pub use interfaces::StoreClient;
pub use interfaces::StoreError;
pub use reconcile::reconcile_team_state;
pub use resolver::CredentialResolver;
pub use resolver::ResolvedIdentity;
pub use telemetry::AdmissionEvent;
pub use telemetry::AdmissionObserver;
pub use telemetry::AdmissionOutcome;
pub use telemetry::NoopObserver;
