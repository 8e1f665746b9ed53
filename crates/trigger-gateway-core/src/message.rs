//! # Canonical Messages
//!
//! Builds the flat message handed to the dispatch engine from a normalized
//! trigger request.
//!
//! The message starts as a shallow copy of the body's fields so that
//! consumers addressing body fields directly keep working. Routing fields
//! are then added by either the legacy `GET` rule or the webhook matcher,
//! and the request details are attached under `gateway`:
//!
//! ```json
//! {
//!   "x": 2,
//!   "name": "foo",
//!   "code": "bar",
//!   "gateway": { "params": {}, "query": {}, "body": {"x": 2}, "headers": {} }
//! }
//! ```

use crate::{
    is_truthy,
    trigger::{headers::normalize_headers, query::normalize_query, RequestParts},
    webhook::WebhookMatcher,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Field marking a message that already failed an earlier stage
pub const PREFLIGHT_ERROR_FIELD: &str = "error$";

/// Field holding the request details
pub const GATEWAY_FIELD: &str = "gateway";

/// Handle assigned by the legacy `GET` rule
pub const LEGACY_HOOK_HANDLE: &str = "hook";

/// Last two non-slash path segments, used by the legacy `GET` rule
static LEGACY_HOOK_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/]+)/([^/]+)$").expect("legacy hook pattern is valid"));

// ============================================================================
// CanonicalMessage
// ============================================================================

/// The normalized message handed to the dispatch engine.
///
/// A flat mapping from field name to value. Built fresh for each invocation
/// and moved into the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMessage(Map<String, Value>);

impl CanonicalMessage {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Shallow copy of a value's fields. Non-object values contribute no
    /// fields.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self(map.clone()),
            _ => Self::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Shallow-merge `fields` into the message; incoming fields win.
    pub fn extend(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Whether an earlier stage marked this message as failed
    pub fn has_preflight_error(&self) -> bool {
        self.get(PREFLIGHT_ERROR_FIELD).is_some_and(is_truthy)
    }
}

impl From<Map<String, Value>> for CanonicalMessage {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// Message building
// ============================================================================

/// Result of building a message from a request
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// Message ready for dispatch
    Ready(CanonicalMessage),

    /// The body already carried a truthy `error$`; the message must be
    /// answered with `400` and never dispatched.
    Preflight(CanonicalMessage),
}

/// Build the canonical message for a request whose body has been resolved.
///
/// 1. Copy the body's fields into a new message.
/// 2. Stop with [`MessageOutcome::Preflight`] when `error$` is truthy.
/// 3. For `GET`, apply the legacy rule: when the path ends in two
///    segments, set `name`, `code` and `handle: "hook"`.
/// 4. For every other method, run the webhook matcher.
/// 5. Attach `gateway` with the raw path params, normalized query, body and
///    normalized headers.
///
/// The legacy rule and webhook matching are mutually exclusive by method: a
/// `GET` request never reaches the webhook matcher.
#[instrument(skip_all, fields(method = parts.method.as_deref().unwrap_or("")))]
pub fn build_message(parts: &RequestParts, body: &Value, webhooks: &WebhookMatcher) -> MessageOutcome {
    let mut message = CanonicalMessage::from_value(body);

    if message.has_preflight_error() {
        debug!("Message carries a preflight error; skipping dispatch");
        return MessageOutcome::Preflight(message);
    }

    let path = parts.request_path();
    if parts.is_get() {
        if let Some(captures) = LEGACY_HOOK_PATH.captures(&path) {
            message.insert("name".to_string(), Value::String(captures[1].to_string()));
            message.insert("code".to_string(), Value::String(captures[2].to_string()));
            message.insert(
                "handle".to_string(),
                Value::String(LEGACY_HOOK_HANDLE.to_string()),
            );
            debug!(path = %path, "Legacy GET hook path matched");
        }
    } else {
        webhooks.apply(&path, &mut message, body);
    }

    let query = normalize_query(parts.query.as_ref(), parts.multi_value_query.as_ref());
    let headers = normalize_headers(parts.headers.as_ref());

    message.insert(
        GATEWAY_FIELD.to_string(),
        json!({
            "params": parts.params.clone().unwrap_or_else(|| Value::Object(Map::new())),
            "query": query,
            "body": body,
            "headers": headers,
        }),
    );

    MessageOutcome::Ready(message)
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
