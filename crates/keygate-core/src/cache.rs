// crates/keygate-core/src/cache.rs
// ============================================================================
// Module: Keygate Authorization Cache
// Description: Process-wide cache for keys, users, and teams with freshness stamps.
// Purpose: Serve resolved records to concurrent admissions without store round-trips.
// Dependencies: crate::core::{identifiers, records, time}
// ============================================================================

//! ## Overview
//! The cache is the single shared mutable resource in the admission layer.
//! Entries carry their own freshness stamp and never actively expire;
//! staleness is a judgment consumers make by comparing stamps (see
//! [`crate::reconcile`]). Writes for a single key are serialized by the inner
//! lock and no read ever observes a partially-written value. No ordering is
//! guaranteed between writes to different keys.
//!
//! Key forms match the durable store's conventions: credential entries are
//! keyed by the hex digest, user entries by the bare user id, team entries by
//! `team_id:<id>`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::core::identifiers::CredentialHash;
use crate::core::identifiers::TeamId;
use crate::core::identifiers::UserId;
use crate::core::records::AuthorizationContext;
use crate::core::records::TeamRecord;
use crate::core::records::UserRecord;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Cache Keys
// ============================================================================

/// Typed cache key with a stable rendered form.
///
/// # Invariants
/// - Rendered forms are disjoint across variants for well-formed identifiers:
///   credential digests are hex, team keys carry the `team_id:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Key record entry, keyed by credential digest.
    Credential(CredentialHash),
    /// User record entry, keyed by user id.
    User(UserId),
    /// Team record entry, keyed by `team_id:<id>`.
    Team(TeamId),
}

impl CacheKey {
    /// Renders the key in the store's conventional string form.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Credential(hash) => hash.as_str().to_string(),
            Self::User(user_id) => user_id.as_str().to_string(),
            Self::Team(team_id) => format!("team_id:{team_id}"),
        }
    }
}

// ============================================================================
// SECTION: Cache Records
// ============================================================================

/// Record stored under a cache key.
///
/// # Invariants
/// - The variant corresponds to the [`CacheKey`] variant it was stored under.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRecord {
    /// Resolved authorization context for a credential.
    Context(AuthorizationContext),
    /// Canonical user record copy.
    User(UserRecord),
    /// Canonical team record copy.
    Team(TeamRecord),
}

impl CacheRecord {
    /// Returns the authorization context when this record holds one.
    #[must_use]
    pub const fn as_context(&self) -> Option<&AuthorizationContext> {
        match self {
            Self::Context(context) => Some(context),
            Self::User(_) | Self::Team(_) => None,
        }
    }

    /// Returns the user record when this record holds one.
    #[must_use]
    pub const fn as_user(&self) -> Option<&UserRecord> {
        match self {
            Self::User(user) => Some(user),
            Self::Context(_) | Self::Team(_) => None,
        }
    }

    /// Returns the team record when this record holds one.
    #[must_use]
    pub const fn as_team(&self) -> Option<&TeamRecord> {
        match self {
            Self::Team(team) => Some(team),
            Self::Context(_) | Self::User(_) => None,
        }
    }
}

/// Cached record together with its freshness stamp.
///
/// # Invariants
/// - `refreshed_at` is monotonically non-decreasing across writes for the
///   same key; [`AuthCache::set`] drops older-stamped writes.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Stored record.
    pub record: CacheRecord,
    /// Freshness stamp assigned by the writer.
    pub refreshed_at: Timestamp,
}

// ============================================================================
// SECTION: Cache
// ============================================================================

/// Process-wide, concurrency-safe authorization cache.
///
/// # Invariants
/// - Handles are cheap clones sharing one map; all clones observe the same
///   entries.
/// - Per-key writes are atomic; readers never observe partial values.
#[derive(Debug, Clone, Default)]
pub struct AuthCache {
    /// Shared entry map keyed by rendered cache keys.
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl AuthCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the read guard, recovering from lock poisoning.
    ///
    /// A poisoned lock means a writer panicked mid-operation; entries are
    /// still structurally complete because writes insert whole values, so the
    /// map remains usable.
    fn read_guard(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Acquires the write guard, recovering from lock poisoning.
    fn write_guard(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns a clone of the entry stored under the key, when present.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.read_guard().get(&key.render()).cloned()
    }

    /// Stores a record under the key with the given freshness stamp.
    ///
    /// Writes stamped older than the stored entry for the same key are
    /// dropped, keeping per-key freshness monotonically non-decreasing.
    pub fn set(&self, key: &CacheKey, record: CacheRecord, refreshed_at: Timestamp) {
        let mut guard = self.write_guard();
        match guard.entry(key.render()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().refreshed_at <= refreshed_at {
                    occupied.insert(CacheEntry {
                        record,
                        refreshed_at,
                    });
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry {
                    record,
                    refreshed_at,
                });
            }
        }
    }

    /// Removes the entry stored under the key.
    pub fn remove(&self, key: &CacheKey) {
        self.write_guard().remove(&key.render());
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    /// Returns true when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
