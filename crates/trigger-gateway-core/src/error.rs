//! Error types for the trigger gateway.
//!
//! Errors are grouped by the stage that raises them:
//!
//! - [`ConfigError`]: raised once, at adapter construction
//! - [`BodyParseError`]: raised per request while resolving the body
//! - [`EventError`] / [`NotationError`]: raised on the event trigger path
//!
//! [`GatewayError`] is the umbrella returned by the HTTP path and knows how
//! to render itself as an [`HttpResponse`].

use crate::{config::GatewayConfig, response::HttpResponse};
use serde_json::json;
use tracing::{error, warn};

/// Top-level error for a trigger invocation
///
/// Dispatch failures are not represented here: the dispatch engine reports
/// them in-band through [`DispatchResult::error`](crate::DispatchResult) and
/// they are shaped into a response by the directive stage.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Request body could not be parsed: {0}")]
    BodyParse(#[from] BodyParseError),

    #[error("Gateway configuration is invalid: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Event trigger could not be decoded: {0}")]
    Event(#[from] EventError),
}

impl GatewayError {
    /// Check if the error was caused by the inbound payload
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::BodyParse(_) => true,
            Self::Event(_) => true,
            Self::Configuration(_) => false,
        }
    }

    /// HTTP status code used when rendering this error as a response
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// Short error name placed in the `error$` payload
    pub fn name(&self) -> &'static str {
        match self {
            Self::BodyParse(_) => "body_parse_error",
            Self::Configuration(_) => "configuration_error",
            Self::Event(_) => "event_error",
        }
    }

    /// Render the error as an HTTP response carrying the configured default
    /// headers and an `{"error$": {...}}` body.
    pub fn into_response(self, config: &GatewayConfig) -> HttpResponse {
        let status = self.status_code();
        if self.is_client_error() {
            warn!(error = %self, status, "Rejecting trigger payload");
        } else {
            error!(error = %self, status, "Trigger gateway failure");
        }

        let mut response = HttpResponse::with_headers(config.headers.clone());
        response.status_code = status;
        response.body = json!({
            "error$": {
                "name": self.name(),
                "message": self.to_string(),
            }
        })
        .to_string();
        response
    }
}

/// Errors while turning a request body into a JSON value
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    #[error("body is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("body stream failed: {message}")]
    Stream { message: String },

    #[error("body is not valid base64: {message}")]
    Base64 { message: String },
}

/// Configuration errors, raised when the adapter is constructed
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("webhook {index}: invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("webhook {index}: {params} params configured but pattern has only {groups} capture groups")]
    TooManyParams {
        index: usize,
        params: usize,
        groups: usize,
    },

    #[error("webhook {index}: param names must not be empty")]
    EmptyParamName { index: usize },

    #[error("auth token cookie name must not be empty")]
    EmptyCookieName,

    #[error("event default message is invalid: {0}")]
    InvalidEventMessage(#[from] NotationError),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors on the non-HTTP event trigger path
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event message is malformed: {0}")]
    Notation(#[from] NotationError),

    #[error("event payload must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("event message must be a string or an object, got {kind}")]
    InvalidMessage { kind: &'static str },
}

/// Errors decoding the compact message notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("at position {position}: {message}")]
pub struct NotationError {
    pub position: usize,
    pub message: String,
}

impl NotationError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
