// crates/keygate-core/tests/admission.rs
// ============================================================================
// Module: Admission Pipeline Tests
// Description: End-to-end admission decisions over an in-memory store.
// Purpose: Validate stage ordering, budget tiers, and reconciliation outcomes.
// Dependencies: keygate-core, tokio
// ============================================================================

//! ## Overview
//! End-to-end tests driving [`AdmissionEngine::admit`] against an in-memory
//! store. Each test builds a fresh engine so cache state never leaks between
//! scenarios.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::Mutex;

use keygate_core::AdmissionEngine;
use keygate_core::AdmissionError;
use keygate_core::AdmissionEvent;
use keygate_core::AdmissionObserver;
use keygate_core::AdmissionOutcome;
use keygate_core::AdmissionRequest;
use keygate_core::AdmissionSettings;
use keygate_core::AuthorizationContext;
use keygate_core::BudgetTier;
use keygate_core::CacheKey;
use keygate_core::CacheRecord;
use keygate_core::Channel;
use keygate_core::Role;
use keygate_core::TeamId;
use keygate_core::TeamRecord;
use keygate_core::Timestamp;
use keygate_core::UserId;
use keygate_core::hash_credential;

use common::MemoryStore;
use common::bare_context;
use common::team_record;
use common::user_record;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a request carrying the given bearer credential.
fn api_request(path: &str, credential: &str) -> AdmissionRequest {
    AdmissionRequest::new(path, Channel::Api)
        .with_header("authorization", format!("Bearer {credential}"))
}

/// Builds an engine over the given store with default settings.
fn engine(store: MemoryStore) -> AdmissionEngine {
    AdmissionEngine::builder()
        .store(store)
        .build()
        .expect("engine builds with a store")
}

/// Observer recording every event for assertion.
#[derive(Default)]
struct RecordingObserver {
    /// Recorded events, in report order.
    events: Mutex<Vec<(AdmissionOutcome, Option<&'static str>)>>,
}

impl AdmissionObserver for RecordingObserver {
    fn record_admission(&self, event: &AdmissionEvent) {
        self.events
            .lock()
            .expect("events lock")
            .push((event.outcome, event.error_kind));
    }
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

#[tokio::test]
async fn missing_credential_is_rejected() {
    let engine = engine(MemoryStore::new());
    let request = AdmissionRequest::new("/chat/completions", Channel::Api);
    let err = engine.admit(&request).await.expect_err("no credential");
    assert!(matches!(err, AdmissionError::Authentication));
}

#[tokio::test]
async fn unknown_credential_is_rejected() {
    let engine = engine(MemoryStore::new());
    let request = api_request("/chat/completions", "sk-unknown");
    let err = engine.admit(&request).await.expect_err("unknown key");
    assert!(matches!(err, AdmissionError::Authentication));
}

#[tokio::test]
async fn admin_secret_bypasses_store() {
    let store = MemoryStore::failing();
    let engine = AdmissionEngine::builder()
        .store(store)
        .settings(AdmissionSettings {
            admin_secrets: vec!["sk-master".to_string()],
            ..AdmissionSettings::default()
        })
        .build()
        .expect("engine builds");
    let request = api_request("/key/generate", "sk-master");
    let admission = engine.admit(&request).await.expect("admin admitted");
    assert_eq!(admission.role, Role::ProxyAdmin);
    assert!(admission.context.user_id.is_none());
}

#[tokio::test]
async fn admin_secret_matching_covers_the_whole_set() {
    let engine = AdmissionEngine::builder()
        .store(MemoryStore::new())
        .settings(AdmissionSettings {
            admin_secrets: vec!["sk-primary".to_string(), "sk-secondary".to_string()],
            ..AdmissionSettings::default()
        })
        .build()
        .expect("engine builds");

    let admission = engine
        .admit(&api_request("/key/generate", "sk-secondary"))
        .await
        .expect("non-first secret admitted");
    assert_eq!(admission.role, Role::ProxyAdmin);

    // Prefixes and extensions of a configured secret are not matches.
    for near_miss in ["sk-primar", "sk-primary0", "sk-"] {
        let err = engine
            .admit(&api_request("/key/generate", near_miss))
            .await
            .expect_err("near-miss secret rejected");
        assert!(matches!(err, AdmissionError::Authentication));
    }
}

#[tokio::test]
async fn store_outage_surfaces_store_error() {
    let engine = engine(MemoryStore::failing());
    let request = api_request("/chat/completions", "sk-anything");
    let err = engine.admit(&request).await.expect_err("store offline");
    assert!(matches!(err, AdmissionError::Store(_)));
    assert_eq!(err.kind(), "store_error");
}

// ============================================================================
// SECTION: Budget Tiers
// ============================================================================

#[tokio::test]
async fn personal_budget_exceeded_rejects() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-user-key");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.user_id = Some(UserId::new("user-a"));
    store.put_key(context);
    store.put_user(user_record("user-a", 11.0, Some(10.0)));

    let engine = engine(store);
    let err = engine
        .admit(&api_request("/chat/completions", "sk-user-key"))
        .await
        .expect_err("over personal budget");
    match err {
        AdmissionError::BudgetExceeded { tier, spend, limit } => {
            assert_eq!(tier, BudgetTier::Personal);
            assert!((spend - 11.0).abs() < f64::EPSILON);
            assert!((limit - 10.0).abs() < f64::EPSILON);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn team_key_ignores_personal_budget() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-team-key");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.user_id = Some(UserId::new("user-a"));
    context.team_id = Some(TeamId::new("team-1"));
    context.team_spend = 50.0;
    context.team_max_budget = Some(100.0);
    store.put_key(context);
    // User is over budget personally; membership in a team shields them.
    store.put_user(user_record("user-a", 11.0, Some(10.0)));

    let engine = engine(store);
    let admission = engine
        .admit(&api_request("/chat/completions", "sk-team-key"))
        .await
        .expect("team budget governs");
    assert_eq!(admission.context.team_id, Some(TeamId::new("team-1")));
}

#[tokio::test]
async fn key_budget_exceeded_rejects_before_team() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-spent-key");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.spend = 5.5;
    context.max_budget = Some(5.0);
    context.team_id = Some(TeamId::new("team-1"));
    context.team_max_budget = Some(1_000.0);
    store.put_key(context);

    let engine = engine(store);
    let err = engine
        .admit(&api_request("/chat/completions", "sk-spent-key"))
        .await
        .expect_err("key budget exhausted");
    assert!(matches!(
        err,
        AdmissionError::BudgetExceeded { tier: BudgetTier::Key, .. }
    ));
}

#[tokio::test]
async fn budget_equal_to_limit_admits() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-at-limit");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.spend = 10.0;
    context.max_budget = Some(10.0);
    store.put_key(context);

    let engine = engine(store);
    engine
        .admit(&api_request("/chat/completions", "sk-at-limit"))
        .await
        .expect("equality does not exceed");
}

#[tokio::test]
async fn missing_user_record_means_unlimited_personal_budget() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-orphan");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.user_id = Some(UserId::new("user-gone"));
    store.put_key(context);

    let engine = engine(store);
    engine
        .admit(&api_request("/chat/completions", "sk-orphan"))
        .await
        .expect("no user row, no personal limit");
}

// ============================================================================
// SECTION: Team Reconciliation
// ============================================================================

/// Seeds a resolved context and an independent team record directly into
/// the engine's cache with explicit freshness stamps.
fn seed_cached_team_state(
    engine: &AdmissionEngine,
    context: AuthorizationContext,
    team: TeamRecord,
) {
    let stamp = context.last_refreshed_at;
    engine.cache().set(
        &CacheKey::Credential(context.token.clone()),
        CacheRecord::Context(context),
        stamp,
    );
    let team_stamp = team.last_refreshed_at;
    engine.cache().set(
        &CacheKey::Team(team.team_id.clone()),
        CacheRecord::Team(team),
        team_stamp,
    );
}

#[tokio::test]
async fn fresher_unblocked_team_record_overrides_stale_snapshot() {
    let engine = engine(MemoryStore::new());
    let token = hash_credential("sk-stale-blocked");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.team_id = Some(TeamId::new("team-1"));
    context.team_blocked = true;
    let team = team_record("team-1", false, 0.0, None, Timestamp::from_unix_millis(2_000));
    seed_cached_team_state(&engine, context, team);

    let admission = engine
        .admit(&api_request("/chat/completions", "sk-stale-blocked"))
        .await
        .expect("fresh record says unblocked");
    assert!(!admission.context.team_blocked);
}

#[tokio::test]
async fn fresher_blocked_team_record_rejects() {
    let engine = engine(MemoryStore::new());
    let token = hash_credential("sk-now-blocked");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.team_id = Some(TeamId::new("team-1"));
    context.team_blocked = false;
    let team = team_record("team-1", true, 0.0, None, Timestamp::from_unix_millis(2_000));
    seed_cached_team_state(&engine, context, team);

    let err = engine
        .admit(&api_request("/chat/completions", "sk-now-blocked"))
        .await
        .expect_err("fresh record says blocked");
    match err {
        AdmissionError::BlockedEntity { team_id } => {
            assert_eq!(team_id, TeamId::new("team-1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn stale_team_record_does_not_override_snapshot() {
    let engine = engine(MemoryStore::new());
    let token = hash_credential("sk-fresh-snapshot");
    let mut context = bare_context(token, Timestamp::from_unix_millis(2_000));
    context.team_id = Some(TeamId::new("team-1"));
    context.team_blocked = false;
    // Independent record is older than the embedded snapshot.
    let team = team_record("team-1", true, 0.0, None, Timestamp::from_unix_millis(1_000));
    seed_cached_team_state(&engine, context, team);

    engine
        .admit(&api_request("/chat/completions", "sk-fresh-snapshot"))
        .await
        .expect("snapshot is the fresher view");
}

#[tokio::test]
async fn reconciled_team_budget_governs_admission() {
    let engine = engine(MemoryStore::new());
    let token = hash_credential("sk-team-over");
    let mut context = bare_context(token, Timestamp::from_unix_millis(1_000));
    context.team_id = Some(TeamId::new("team-1"));
    context.team_spend = 1.0;
    context.team_max_budget = Some(100.0);
    let team = team_record(
        "team-1",
        false,
        150.0,
        Some(100.0),
        Timestamp::from_unix_millis(2_000),
    );
    seed_cached_team_state(&engine, context, team);

    let err = engine
        .admit(&api_request("/chat/completions", "sk-team-over"))
        .await
        .expect_err("reconciled team spend exceeds budget");
    assert!(matches!(
        err,
        AdmissionError::BudgetExceeded { tier: BudgetTier::Team, .. }
    ));
}

// ============================================================================
// SECTION: Body Screening
// ============================================================================

#[tokio::test]
async fn prohibited_body_parameter_rejects() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-body");
    store.put_key(bare_context(token, Timestamp::from_unix_millis(1_000)));

    let engine = engine(store);
    let request = api_request("/chat/completions", "sk-body")
        .with_body(br#"{"model":"gpt-4","api_base":"https://evil.example"}"#.to_vec());
    let err = engine.admit(&request).await.expect_err("denylisted key");
    match err {
        AdmissionError::ProhibitedParameter { key } => assert_eq!(key, "api_base"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        engine
            .admit(&request)
            .await
            .expect_err("still rejected")
            .to_string(),
        "api_base is not allowed in request body"
    );
}

#[tokio::test]
async fn clean_body_passes_screening() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-clean");
    store.put_key(bare_context(token, Timestamp::from_unix_millis(1_000)));

    let engine = engine(store);
    let request = api_request("/chat/completions", "sk-clean")
        .with_body(br#"{"model":"gpt-4","messages":[]}"#.to_vec());
    engine.admit(&request).await.expect("clean body admitted");
}

// ============================================================================
// SECTION: Global Route Allow-List
// ============================================================================

#[tokio::test]
async fn global_allowed_routes_restricts_even_admin_secrets() {
    let store = MemoryStore::failing();
    let engine = AdmissionEngine::builder()
        .store(store)
        .settings(AdmissionSettings {
            admin_secrets: vec!["sk-master".to_string()],
            allowed_routes: Some(vec!["/chat/completions".to_string()]),
            ..AdmissionSettings::default()
        })
        .build()
        .expect("engine builds");

    engine
        .admit(&api_request("/chat/completions", "sk-master"))
        .await
        .expect("listed route admitted");
    let err = engine
        .admit(&api_request("/key/generate", "sk-master"))
        .await
        .expect_err("unlisted route rejected");
    assert!(matches!(err, AdmissionError::ForbiddenRoute { .. }));
}

// ============================================================================
// SECTION: Caching
// ============================================================================

#[tokio::test]
async fn resolved_credential_is_served_from_cache() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-cached");
    store.put_key(bare_context(token, Timestamp::from_unix_millis(1_000)));

    let engine = engine(store);
    let request = api_request("/chat/completions", "sk-cached");
    engine.admit(&request).await.expect("first call hits the store");
    assert!(!engine.cache().is_empty());
    engine.admit(&request).await.expect("second call hits the cache");
}

// ============================================================================
// SECTION: Telemetry
// ============================================================================

#[tokio::test]
async fn observer_sees_one_event_per_decision() {
    let store = MemoryStore::new();
    let token = hash_credential("sk-observed");
    store.put_key(bare_context(token, Timestamp::from_unix_millis(1_000)));

    let observer = Arc::new(RecordingObserver::default());
    let engine = AdmissionEngine::builder()
        .store(store)
        .observer(Arc::clone(&observer))
        .build()
        .expect("engine builds");

    engine
        .admit(&api_request("/chat/completions", "sk-observed"))
        .await
        .expect("admitted");
    engine
        .admit(&api_request("/chat/completions", "sk-wrong"))
        .await
        .expect_err("rejected");

    let events = observer.events.lock().expect("events lock");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], (AdmissionOutcome::Admitted, None));
    assert_eq!(events[1], (AdmissionOutcome::Rejected, Some("authentication_error")));
}
