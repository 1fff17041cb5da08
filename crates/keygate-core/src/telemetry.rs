// crates/keygate-core/src/telemetry.rs
// ============================================================================
// Module: Keygate Admission Telemetry
// Description: Observability hooks for admission decisions.
// Purpose: Provide decision events and latency without hard dependencies.
// Dependencies: crate::core::request
// ============================================================================

//! ## Overview
//! This module exposes a thin observer interface for admission counters and
//! latency. It is intentionally dependency-light so deployments can plug in
//! Prometheus or OpenTelemetry without redesign. Events carry stable labels
//! and never raw credentials; the route is the only caller-supplied string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use crate::core::request::Channel;

// ============================================================================
// SECTION: Outcome Labels
// ============================================================================

/// Admission decision outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum AdmissionOutcome {
    /// Request admitted.
    Admitted,
    /// Request rejected by a guard stage.
    Rejected,
}

impl AdmissionOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Rejected => "rejected",
        }
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Admission decision event payload.
///
/// # Invariants
/// - `error_kind` is `None` exactly when the outcome is
///   [`AdmissionOutcome::Admitted`].
#[derive(Debug, Clone)]
pub struct AdmissionEvent {
    /// Decision outcome.
    pub outcome: AdmissionOutcome,
    /// Stable error kind label when the request was rejected.
    pub error_kind: Option<&'static str>,
    /// Requested route.
    pub route: String,
    /// Authentication channel.
    pub channel: Channel,
    /// Wall time the decision took.
    pub latency: Duration,
}

// ============================================================================
// SECTION: Observer
// ============================================================================

/// Observer interface for admission decisions.
///
/// Implement this to integrate with a metrics system; the engine reports
/// exactly one event per decision.
pub trait AdmissionObserver: Send + Sync {
    /// Records one admission decision.
    fn record_admission(&self, event: &AdmissionEvent);
}

impl<T: AdmissionObserver + ?Sized> AdmissionObserver for Arc<T> {
    fn record_admission(&self, event: &AdmissionEvent) {
        self.as_ref().record_admission(event);
    }
}

/// No-op observer used when no telemetry backend is wired.
///
/// # Invariants
/// - Discards every event.
pub struct NoopObserver;

impl AdmissionObserver for NoopObserver {
    fn record_admission(&self, _event: &AdmissionEvent) {}
}
