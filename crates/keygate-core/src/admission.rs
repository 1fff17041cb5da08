// crates/keygate-core/src/admission.rs
// ============================================================================
// Module: Keygate Admission Orchestrator
// Description: Ordered decision pipeline composing all guard stages.
// Purpose: Produce one all-or-nothing admission decision per request.
// Dependencies: crate::{cache, core, error, guards, interfaces, reconcile, resolver, telemetry}
// ============================================================================

//! ## Overview
//! The engine runs the fixed stage order (credential resolution, team
//! reconciliation, network policy, route authorization, body screening,
//! budget), short-circuiting on the first failure. Success is
//! all-or-nothing: either every stage passes and the caller receives the
//! resolved [`Admission`], or a typed [`AdmissionError`] propagates to the
//! boundary unchanged.
//!
//! The cache handle, store client, and settings snapshot are explicit
//! injected dependencies, never ambient globals; concurrent safety is a
//! contract of [`AuthCache`] rather than an accident of shared state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::cache::AuthCache;
use crate::core::records::AuthorizationContext;
use crate::core::request::AdmissionRequest;
use crate::core::roles::Role;
use crate::error::AdmissionError;
use crate::guards::body::screen_body;
use crate::guards::budget::check_budget;
use crate::guards::network::enforce_client_ip;
use crate::guards::routes::RouteMatrix;
use crate::guards::routes::check_allowed_routes;
use crate::guards::routes::check_route;
use crate::interfaces::StoreClient;
use crate::reconcile::reconcile_team_state;
use crate::resolver::CredentialResolver;
use crate::resolver::ResolvedIdentity;
use crate::telemetry::AdmissionEvent;
use crate::telemetry::AdmissionObserver;
use crate::telemetry::AdmissionOutcome;
use crate::telemetry::NoopObserver;

// ============================================================================
// SECTION: Settings Snapshot
// ============================================================================

/// Read-only configuration snapshot consumed per request.
///
/// # Invariants
/// - A snapshot is immutable once handed to the engine; configuration
///   reloads build a new engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionSettings {
    /// Administrative secrets granting the highest-privilege role.
    #[serde(default)]
    pub admin_secrets: Vec<String>,
    /// Source-IP allow-list; `None` means no restriction, empty denies all.
    pub allowed_ips: Option<Vec<String>>,
    /// Trust the forwarding header in place of the transport address.
    #[serde(default)]
    pub use_x_forwarded_for: bool,
    /// Global route allow-list evaluated before any role matrix.
    pub allowed_routes: Option<Vec<String>>,
}

// ============================================================================
// SECTION: Build Errors
// ============================================================================

/// Errors returned when assembling an admission engine.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EngineBuildError {
    /// No durable-store client was configured.
    #[error("admission engine store client is not configured")]
    MissingStore,
}

// ============================================================================
// SECTION: Engine Builder
// ============================================================================

/// Builder for an admission engine.
///
/// # Invariants
/// - `build` succeeds only when a store client is configured.
/// - Cache and observer default to a fresh cache and the no-op observer.
#[derive(Default)]
pub struct AdmissionEngineBuilder {
    /// Shared cache handle, when injected.
    cache: Option<AuthCache>,
    /// Durable-store read client.
    store: Option<Arc<dyn StoreClient>>,
    /// Configuration snapshot.
    settings: AdmissionSettings,
    /// Decision observer, when injected.
    observer: Option<Arc<dyn AdmissionObserver>>,
}

impl AdmissionEngineBuilder {
    /// Injects a shared cache handle.
    #[must_use]
    pub fn cache(mut self, cache: AuthCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Registers the durable-store client.
    #[must_use]
    pub fn store(mut self, store: impl StoreClient + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Sets the configuration snapshot.
    #[must_use]
    pub fn settings(mut self, settings: AdmissionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Registers a decision observer.
    #[must_use]
    pub fn observer(mut self, observer: impl AdmissionObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Builds the admission engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineBuildError::MissingStore`] when no store client is
    /// configured.
    pub fn build(self) -> Result<AdmissionEngine, EngineBuildError> {
        Ok(AdmissionEngine {
            cache: self.cache.unwrap_or_default(),
            store: self.store.ok_or(EngineBuildError::MissingStore)?,
            settings: self.settings,
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
        })
    }
}

// ============================================================================
// SECTION: Admission
// ============================================================================

/// Successful admission decision handed to downstream request handling.
///
/// # Invariants
/// - `role` equals `context.role`; it is surfaced separately for handler-
///   level authorization decisions.
/// - Downstream treats the context as read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    /// Resolved, reconciled authorization context.
    pub context: AuthorizationContext,
    /// Normalized canonical role.
    pub role: Role,
}

// ============================================================================
// SECTION: Admission Engine
// ============================================================================

/// Ordered admission pipeline over injected dependencies.
///
/// # Invariants
/// - A store client is always configured.
/// - One logical decision runs per request; the cache is the only shared
///   mutable resource across concurrent decisions.
pub struct AdmissionEngine {
    /// Shared authorization cache.
    cache: AuthCache,
    /// Durable-store read client.
    store: Arc<dyn StoreClient>,
    /// Configuration snapshot.
    settings: AdmissionSettings,
    /// Decision observer.
    observer: Arc<dyn AdmissionObserver>,
}

impl AdmissionEngine {
    /// Returns a builder for the admission engine.
    #[must_use]
    pub fn builder() -> AdmissionEngineBuilder {
        AdmissionEngineBuilder::default()
    }

    /// Returns the engine's cache handle.
    #[must_use]
    pub const fn cache(&self) -> &AuthCache {
        &self.cache
    }

    /// Runs the admission pipeline for one request.
    ///
    /// Exactly one event is reported to the observer per call, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns the first guard stage's [`AdmissionError`]; see
    /// [`crate::error`] for the taxonomy.
    pub async fn admit(&self, request: &AdmissionRequest) -> Result<Admission, AdmissionError> {
        let started = Instant::now();
        let result = self.evaluate(request).await;
        let (outcome, error_kind) = match &result {
            Ok(_) => (AdmissionOutcome::Admitted, None),
            Err(err) => (AdmissionOutcome::Rejected, Some(err.kind())),
        };
        self.observer.record_admission(&AdmissionEvent {
            outcome,
            error_kind,
            route: request.path.clone(),
            channel: request.channel,
            latency: started.elapsed(),
        });
        result
    }

    /// Evaluates the ordered stage pipeline.
    async fn evaluate(&self, request: &AdmissionRequest) -> Result<Admission, AdmissionError> {
        let credential = request.bearer_credential().ok_or(AdmissionError::Authentication)?;
        let resolver = CredentialResolver::new(self.cache.clone(), Arc::clone(&self.store));
        let ResolvedIdentity {
            mut context,
            user,
        } = resolver.resolve(credential, &self.settings.admin_secrets).await?;

        reconcile_team_state(&mut context, &self.cache, self.store.as_ref()).await?;
        enforce_client_ip(
            self.settings.allowed_ips.as_deref(),
            request,
            self.settings.use_x_forwarded_for,
        )?;
        check_allowed_routes(self.settings.allowed_routes.as_deref(), &request.path)?;
        check_route(RouteMatrix::for_channel(request.channel), context.role, &request.path)?;
        screen_body(request.body.as_deref())?;
        check_budget(&context, user.as_ref())?;

        Ok(Admission {
            role: context.role,
            context,
        })
    }
}
