// crates/keygate-core/src/core/mod.rs
// ============================================================================
// Module: Keygate Core Data Model
// Description: Identifiers, roles, records, hashing, time, and request views.
// Purpose: Provide the fixed-shape data model shared by all admission stages.
// Dependencies: serde, serde_json, sha2, subtle, time
// ============================================================================

//! ## Overview
//! The core data model is deliberately fixed-shape: optional attributes are
//! explicit `Option` fields, roles are a closed enum behind a total
//! legacy-alias mapping, and identifiers are opaque newtypes with stable
//! serde forms. Guard stages compute over these types only; nothing in this
//! module performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod hashing;
pub mod identifiers;
pub mod records;
pub mod request;
pub mod security;
pub mod roles;
pub mod time;
