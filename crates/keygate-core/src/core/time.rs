// crates/keygate-core/src/core/time.rs
// ============================================================================
// Module: Keygate Time Model
// Description: Freshness timestamps for cached authorization records.
// Purpose: Provide a single timestamp representation for staleness comparison.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Cache freshness is decided by comparing [`Timestamp`] values at read time;
//! there is no locking and no active expiry. [`Timestamp::now`] is the only
//! wall-clock read in the crate, so tests pin explicit values and stay
//! deterministic. The comparison-only model preserves the staleness window
//! documented in [`crate::reconcile`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Unix-epoch-milliseconds timestamp used for cache freshness comparison.
///
/// # Invariants
/// - Ordering follows wall-clock order for values produced by [`Timestamp::now`].
/// - No validation is performed on explicitly constructed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix-epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix-epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Reads the current wall-clock time.
    ///
    /// Millisecond precision keeps values comparable with store-issued
    /// `last_refreshed_at` stamps.
    #[must_use]
    pub fn now() -> Self {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        Self(i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX))
    }
}
