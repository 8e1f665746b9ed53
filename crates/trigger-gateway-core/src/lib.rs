//! # Trigger Gateway Core
//!
//! Boundary adapter between serverless function triggers and a message
//! dispatch engine.
//!
//! Inbound trigger payloads arrive in several runtime-specific shapes (HTTP
//! requests from different hosting runtimes, plus raw event-bus messages).
//! This crate normalizes them into a single [`CanonicalMessage`], hands that
//! message to a [`Dispatcher`], and turns the dispatch result back into an
//! [`HttpResponse`] (or returns it untouched for event triggers).
//!
//! ## Architecture
//!
//! ```text
//! TriggerRequest ──► build_message ──► Dispatcher ──► apply_directive ──► HttpResponse
//!                    (headers, query,                  (cookies, redirect,
//!                     body, webhooks)                   status, headers)
//!
//! event payload ───► EventAdapter ───► Dispatcher ──► DispatchResult
//! ```
//!
//! - The dispatch engine is abstracted behind the [`Dispatcher`] trait
//! - Configuration is loaded once into a [`GatewayConfig`] and compiled into
//!   an immutable [`TriggerGateway`]
//! - The only suspension points are body stream draining and the dispatch call
//!
//! ## Usage
//!
//! ```rust
//! use trigger_gateway_core::{normalize_headers, FieldCollection};
//! use serde_json::json;
//!
//! let headers = FieldCollection::from_value(&json!({"Foo-Bar": "Zed"}));
//! let normalized = normalize_headers(headers.as_ref());
//! assert_eq!(normalized["foo-bar"], json!("Zed"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use ulid::Ulid;

pub mod config;
pub mod cookie;
pub mod directive;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod gateway;
pub mod message;
pub mod notation;
pub mod response;
pub mod telemetry;
pub mod trigger;
pub mod webhook;

pub use config::{AuthConfig, EventConfig, GatewayConfig, LoggingConfig, TokenConfig, WebhookRouteConfig};
pub use cookie::{expired_cookie, serialize_cookie, CookieAttributes, SameSite};
pub use directive::{apply_directive, AuthDirective, RedirectDirective, ResponseDirective};
pub use dispatch::{DispatchResult, Dispatcher, InvocationContext, SideChannel};
pub use error::{BodyParseError, ConfigError, EventError, GatewayError, NotationError};
pub use event::EventAdapter;
pub use gateway::TriggerGateway;
pub use message::{build_message, CanonicalMessage, MessageOutcome};
pub use notation::decode_notation;
pub use response::HttpResponse;
pub use telemetry::init_logging;
pub use trigger::{
    body::resolve_body, headers::normalize_headers, query::normalize_query, BodyStream,
    FieldCollection, RequestBody, RequestParts, TriggerRequest,
};
pub use webhook::{WebhookMatcher, WebhookSpec};

/// Standard result type for trigger gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

// ============================================================================
// Invocation Identifier
// ============================================================================

/// Unique identifier for a single trigger invocation
///
/// Uses ULID so identifiers sort by creation time in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Ulid);

impl InvocationId {
    /// Generate a new unique invocation ID
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// JSON helpers
// ============================================================================

/// JavaScript-style truthiness of a JSON value.
///
/// `null`, `false`, `0`, and the empty string are falsy; every array and
/// object (even empty) is truthy.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
