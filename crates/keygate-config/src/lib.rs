// crates/keygate-config/src/lib.rs
// ============================================================================
// Module: Keygate Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for keygate.toml semantics.
// Dependencies: keygate-core, serde, toml
// ============================================================================

//! ## Overview
//! `keygate-config` defines the canonical configuration model for the
//! admission gateway. It provides strict, fail-closed validation and
//! converts the deployment file into the engine's settings snapshot.
//!
//! Security posture: config inputs are untrusted; parsing rejects unknown
//! fields, oversized files, and out-of-bound collection sizes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AdmissionConfig;
pub use config::ConfigError;
pub use config::GatewayConfig;
