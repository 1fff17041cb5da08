// crates/keygate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Keygate Interfaces
// Description: Backend-agnostic interface to the durable store.
// Purpose: Define the read-path contract the admission layer requires.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! The durable store is an external collaborator; the admission layer sees it
//! only through [`StoreClient`], an eventually-consistent read-only source of
//! truth consulted on cache miss. Fetches are the sole suspending operations
//! in the pipeline. Implementations must distinguish "record does not exist"
//! (`Ok(None)`) from "the store failed" (`Err`); the pipeline fails closed on
//! both, with different error kinds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::identifiers::CredentialHash;
use crate::core::identifiers::TeamId;
use crate::core::identifiers::UserId;
use crate::core::records::AuthorizationContext;
use crate::core::records::TeamRecord;
use crate::core::records::UserRecord;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Durable-store read-path errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A fetched record failed to decode into its canonical shape.
    #[error("store record decode failure: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Store Client
// ============================================================================

/// Read-path contract for the durable store behind the cache.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetches the key record for a credential digest.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot answer; `Ok(None)` means
    /// the credential is unknown.
    async fn fetch_key(
        &self,
        token: &CredentialHash,
    ) -> Result<Option<AuthorizationContext>, StoreError>;

    /// Fetches the canonical user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot answer; `Ok(None)` means
    /// no such user exists.
    async fn fetch_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Fetches the canonical team record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot answer; `Ok(None)` means
    /// no such team exists.
    async fn fetch_team(&self, team_id: &TeamId) -> Result<Option<TeamRecord>, StoreError>;
}
