// crates/keygate-core/src/guards/mod.rs
// ============================================================================
// Module: Keygate Guard Stages
// Description: Network policy, route authorization, body screening, budgets.
// Purpose: Pure, fail-closed checks composed by the admission orchestrator.
// Dependencies: crate::core, crate::error
// ============================================================================

//! ## Overview
//! Guard stages are pure functions over already-resolved in-memory data: no
//! guard performs I/O or suspends. Each stage rejects with its specific
//! [`crate::error::AdmissionError`] variant and the orchestrator composes
//! them in a fixed order, short-circuiting on the first failure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod body;
pub mod budget;
pub mod network;
pub mod routes;
