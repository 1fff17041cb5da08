// crates/keygate-core/src/resolver.rs
// ============================================================================
// Module: Keygate Credential Resolver
// Description: Bearer-credential resolution through cache and durable store.
// Purpose: Turn a presented secret into a working authorization context.
// Dependencies: crate::cache, crate::core, crate::error, crate::interfaces
// ============================================================================

//! ## Overview
//! Resolution order is fixed: the administrative-secret fast path first (an
//! exact match bypasses cache and store entirely and yields the
//! highest-privilege role), then a cache lookup by credential hash, then a
//! store fetch with write-through on miss. An unknown credential is an
//! authentication failure, fatal and never retried.
//!
//! When the working identity names a user, the canonical user record is
//! resolved through the same cache-then-store path so the budget guard can
//! consult personal limits. A missing user row is tolerated: personal limits
//! are simply unknown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::cache::AuthCache;
use crate::cache::CacheKey;
use crate::cache::CacheRecord;
use crate::core::hashing::hash_credential;
use crate::core::hashing::strip_bearer;
use crate::core::identifiers::UserId;
use crate::core::records::AuthorizationContext;
use crate::core::records::UserRecord;
use crate::core::security::constant_time_contains;
use crate::core::time::Timestamp;
use crate::error::AdmissionError;
use crate::interfaces::StoreClient;

// ============================================================================
// SECTION: Resolved Identity
// ============================================================================

/// Working identity produced by credential resolution.
///
/// # Invariants
/// - `user` is present only when the context names a `user_id` and the
///   record could be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    /// Working authorization context for the request.
    pub context: AuthorizationContext,
    /// Canonical user record, when one was resolved.
    pub user: Option<UserRecord>,
}

// ============================================================================
// SECTION: Credential Resolver
// ============================================================================

/// Resolves bearer credentials against the cache and durable store.
///
/// # Invariants
/// - Raw secrets are hashed before any cache or store interaction.
/// - Administrative-secret matching is constant-time over every configured
///   secret; match position and near-miss length do not shape latency.
/// - Cache writes happen only after a complete record is in hand; a
///   cancelled resolution leaves no partial entries.
pub struct CredentialResolver {
    /// Shared cache handle.
    cache: AuthCache,
    /// Durable-store read client.
    store: Arc<dyn StoreClient>,
}

impl CredentialResolver {
    /// Creates a resolver over the shared cache and store client.
    #[must_use]
    pub fn new(cache: AuthCache, store: Arc<dyn StoreClient>) -> Self {
        Self {
            cache,
            store,
        }
    }

    /// Resolves a presented credential to a working identity.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Authentication`] when the credential matches
    /// no administrative secret and no key record, or
    /// [`AdmissionError::Store`] when the durable store fails.
    pub async fn resolve(
        &self,
        raw_credential: &str,
        admin_secrets: &[String],
    ) -> Result<ResolvedIdentity, AdmissionError> {
        let token = hash_credential(raw_credential);
        let presented = strip_bearer(raw_credential);
        if constant_time_contains(admin_secrets, presented) {
            return Ok(ResolvedIdentity {
                context: AuthorizationContext::for_admin(token, Timestamp::now()),
                user: None,
            });
        }

        let key = CacheKey::Credential(token.clone());
        let cached = self.cache.get(&key).and_then(|entry| entry.record.as_context().cloned());
        let context = match cached {
            Some(context) => context,
            None => {
                let Some(mut fetched) = self.store.fetch_key(&token).await? else {
                    return Err(AdmissionError::Authentication);
                };
                fetched.token = token;
                fetched.last_refreshed_at = Timestamp::now();
                self.cache.set(
                    &key,
                    CacheRecord::Context(fetched.clone()),
                    fetched.last_refreshed_at,
                );
                fetched
            }
        };

        let user = match &context.user_id {
            Some(user_id) => self.resolve_user(user_id).await?,
            None => None,
        };
        Ok(ResolvedIdentity {
            context,
            user,
        })
    }

    /// Resolves the canonical user record through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Store`] when the durable store fails; a
    /// missing user row resolves to `None`.
    async fn resolve_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, AdmissionError> {
        let key = CacheKey::User(user_id.clone());
        if let Some(entry) = self.cache.get(&key) {
            if let Some(user) = entry.record.as_user() {
                return Ok(Some(user.clone()));
            }
        }
        let Some(user) = self.store.fetch_user(user_id).await? else {
            return Ok(None);
        };
        self.cache.set(&key, CacheRecord::User(user.clone()), Timestamp::now());
        Ok(Some(user))
    }
}
