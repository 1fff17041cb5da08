// crates/keygate-core/src/reconcile.rs
// ============================================================================
// Module: Keygate Team-State Reconciler
// Description: Freshness-based reconciliation of embedded team snapshots.
// Purpose: Decide which record is authoritative when cached team state disagrees.
// Dependencies: crate::cache, crate::core, crate::error, crate::interfaces
// ============================================================================

//! ## Overview
//! A key record embeds a snapshot of its team's state (blocked flag, spend,
//! budget) taken when the key was cached. Team state is written
//! asynchronously (a block action can land after the snapshot), so the
//! reconciler compares the snapshot's freshness stamp against the
//! independently cached team record and lets the more recently refreshed one
//! win, in the in-memory working context only. Cache entries are never
//! rewritten to agree.
//!
//! Known staleness window: stamps are wall-clock values compared at read
//! time with no locking. Under concurrent writes to the same team, a block
//! that has not yet propagated to the cache can still admit. This window is
//! inherent to the cache model and is preserved deliberately; freshness
//! comparison, not mutual exclusion, is the consistency mechanism here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::cache::AuthCache;
use crate::cache::CacheKey;
use crate::cache::CacheRecord;
use crate::core::records::AuthorizationContext;
use crate::core::records::TeamRecord;
use crate::error::AdmissionError;
use crate::interfaces::StoreClient;

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

/// Looks up the independent team record, fetching and caching on miss.
async fn independent_team_record(
    team_key: &CacheKey,
    cache: &AuthCache,
    store: &dyn StoreClient,
) -> Result<Option<TeamRecord>, AdmissionError> {
    if let Some(entry) = cache.get(team_key) {
        if let Some(team) = entry.record.as_team() {
            return Ok(Some(team.clone()));
        }
    }
    let CacheKey::Team(team_id) = team_key else {
        return Ok(None);
    };
    let Some(team) = store.fetch_team(team_id).await? else {
        return Ok(None);
    };
    cache.set(team_key, CacheRecord::Team(team.clone()), team.last_refreshed_at);
    Ok(Some(team))
}

/// Reconciles the working context's team state and enforces the block flag.
///
/// When the independent team record is at least as fresh as the embedded
/// snapshot, its `blocked` flag and spend figures overwrite the snapshot in
/// the working context; ties favor the independent record because team
/// writes land there first. A team limit is adopted only when the record
/// carries one, so a snapshot budget survives a record that omits it.
///
/// # Errors
///
/// Returns [`AdmissionError::BlockedEntity`] when the authoritative state is
/// blocked, or [`AdmissionError::Store`] when the durable store fails.
pub async fn reconcile_team_state(
    context: &mut AuthorizationContext,
    cache: &AuthCache,
    store: &dyn StoreClient,
) -> Result<(), AdmissionError> {
    let Some(team_id) = context.team_id.clone() else {
        return Ok(());
    };
    let team_key = CacheKey::Team(team_id.clone());
    if let Some(team) = independent_team_record(&team_key, cache, store).await? {
        if team.last_refreshed_at >= context.last_refreshed_at {
            context.team_blocked = team.blocked;
            context.team_spend = team.spend;
            if team.max_budget.is_some() {
                context.team_max_budget = team.max_budget;
            }
        }
    }
    if context.team_blocked {
        return Err(AdmissionError::BlockedEntity {
            team_id,
        });
    }
    Ok(())
}
