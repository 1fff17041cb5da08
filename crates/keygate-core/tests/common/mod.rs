// crates/keygate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for keygate-core tests.
// Purpose: Provide an in-memory store and record builders for pipeline tests.
// Dependencies: keygate-core
// ============================================================================

//! ## Overview
//! Provides an in-memory [`StoreClient`] implementation and record builders
//! shared by the admission pipeline integration tests.

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
    dead_code,
    reason = "Test-only helpers; not every test file uses every helper."
)]

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use keygate_core::AuthorizationContext;
use keygate_core::CredentialHash;
use keygate_core::Role;
use keygate_core::StoreClient;
use keygate_core::StoreError;
use keygate_core::TeamId;
use keygate_core::TeamRecord;
use keygate_core::Timestamp;
use keygate_core::UserId;
use keygate_core::UserRecord;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory durable-store stand-in for pipeline tests.
#[derive(Default)]
pub struct MemoryStore {
    /// Key records by credential digest.
    keys: Mutex<HashMap<String, AuthorizationContext>>,
    /// User records by user id.
    users: Mutex<HashMap<String, UserRecord>>,
    /// Team records by team id.
    teams: Mutex<HashMap<String, TeamRecord>>,
    /// When true, every fetch fails as unavailable.
    unavailable: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every fetch fails.
    pub fn failing() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Inserts a key record.
    pub fn put_key(&self, context: AuthorizationContext) {
        self.keys
            .lock()
            .expect("keys lock")
            .insert(context.token.as_str().to_string(), context);
    }

    /// Inserts a user record.
    pub fn put_user(&self, user: UserRecord) {
        self.users.lock().expect("users lock").insert(user.user_id.as_str().to_string(), user);
    }

    /// Inserts a team record.
    pub fn put_team(&self, team: TeamRecord) {
        self.teams.lock().expect("teams lock").insert(team.team_id.as_str().to_string(), team);
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn fetch_key(
        &self,
        token: &CredentialHash,
    ) -> Result<Option<AuthorizationContext>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        Ok(self.keys.lock().expect("keys lock").get(token.as_str()).cloned())
    }

    async fn fetch_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        Ok(self.users.lock().expect("users lock").get(user_id.as_str()).cloned())
    }

    async fn fetch_team(&self, team_id: &TeamId) -> Result<Option<TeamRecord>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        Ok(self.teams.lock().expect("teams lock").get(team_id.as_str()).cloned())
    }
}

// ============================================================================
// SECTION: Record Builders
// ============================================================================

/// Builds a key-record context with no user, team, or budget attributes.
pub fn bare_context(token: CredentialHash, refreshed_at: Timestamp) -> AuthorizationContext {
    AuthorizationContext {
        token,
        user_id: None,
        team_id: None,
        role: Role::InternalUser,
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

/// Builds a user record with the given spend and personal budget.
pub fn user_record(user_id: &str, spend: f64, max_budget: Option<f64>) -> UserRecord {
    UserRecord {
        user_id: UserId::new(user_id),
        spend,
        max_budget,
        role: Role::InternalUser,
        model_max_budget: BTreeMap::new(),
        model_spend: BTreeMap::new(),
        tpm_limit: None,
        rpm_limit: None,
        organization_memberships: Vec::new(),
    }
}

/// Builds a team record with the given blocked flag and freshness stamp.
pub fn team_record(
    team_id: &str,
    blocked: bool,
    spend: f64,
    max_budget: Option<f64>,
    refreshed_at: Timestamp,
) -> TeamRecord {
    TeamRecord {
        team_id: TeamId::new(team_id),
        blocked,
        spend,
        max_budget,
        last_refreshed_at: refreshed_at,
    }
}
