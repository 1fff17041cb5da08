// crates/keygate-core/src/core/request.rs
// ============================================================================
// Module: Keygate Admission Request View
// Description: Request-local view over an inbound HTTP request.
// Purpose: Carry the headers, route, address, and body the pipeline inspects.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The serving framework owns the real HTTP request; the admission pipeline
//! sees this request-local view. All fields are snapshots taken before
//! admission starts, so guard stages compute over already-resolved in-memory
//! data and never suspend. The body is raw bytes the server layer already
//! read; the screener parses it lazily.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Header Names
// ============================================================================

/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// Forwarding header trusted only when the configuration opts in.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

// ============================================================================
// SECTION: Authentication Channel
// ============================================================================

/// How the request authenticated; selects the route matrix.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Programmatic caller presenting a bearer key.
    Api,
    /// Console-originated call authenticated through a UI session.
    Ui,
}

impl Channel {
    /// Returns a stable label for the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Ui => "ui",
        }
    }
}

// ============================================================================
// SECTION: Admission Request
// ============================================================================

/// Request-local snapshot consumed by the admission pipeline.
///
/// # Invariants
/// - `client_ip` is the transport-level peer address when known; forwarding
///   headers are consulted only by the network policy guard.
/// - `body` is the raw payload bytes, unparsed until the body screener runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRequest {
    /// Requested route path.
    pub path: String,
    /// Transport-level client address, when the transport provides one.
    pub client_ip: Option<String>,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Authentication channel.
    pub channel: Channel,
    /// Raw request body bytes, when a body was sent.
    pub body: Option<Vec<u8>>,
}

impl AdmissionRequest {
    /// Creates a request view for the given route and channel.
    #[must_use]
    pub fn new(path: impl Into<String>, channel: Channel) -> Self {
        Self {
            path: path.into(),
            client_ip: None,
            headers: BTreeMap::new(),
            channel,
            body: None,
        }
    }

    /// Sets the transport-level client address.
    #[must_use]
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Adds a header; names are stored lowercase for case-insensitive lookup.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the raw body bytes.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Looks up a header value case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers.get(&wanted).map(String::as_str)
    }

    /// Returns the bearer credential header value, when present.
    #[must_use]
    pub fn bearer_credential(&self) -> Option<&str> {
        self.header(AUTHORIZATION_HEADER)
    }
}
