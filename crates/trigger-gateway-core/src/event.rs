//! # Event Triggers
//!
//! Non-HTTP triggers (queues, buses, timers) deliver a raw event object.
//! The message to dispatch travels inside it as compact notation:
//!
//! ```text
//! { "seneca$": { "msg": "foo:1" }, ...other event fields }
//! ```
//!
//! The dispatched message carries the raw event under `request`, with the
//! decoded message fields alongside it. The dispatch result is returned
//! as-is, with no HTTP shaping.

use crate::{
    config::EventConfig,
    dispatch::{DispatchResult, Dispatcher, InvocationContext, SideChannel},
    error::{json_kind, ConfigError, EventError},
    message::CanonicalMessage,
    notation::decode_notation,
};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

/// Event field carrying the embedded message envelope
pub const ENVELOPE_FIELD: &str = "seneca$";

/// Envelope field carrying the message itself
pub const MESSAGE_FIELD: &str = "msg";

/// Message field holding the raw event
pub const REQUEST_FIELD: &str = "request";

/// Decodes event payloads into canonical messages and dispatches them.
#[derive(Debug, Clone)]
pub struct EventAdapter {
    default_message: Map<String, Value>,
}

impl EventAdapter {
    /// Create an adapter, decoding the configured default message once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEventMessage`] when the default message
    /// is not valid notation.
    pub fn new(config: &EventConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            default_message: decode_notation(&config.msg)?,
        })
    }

    /// Message fields used when an event carries no message of its own
    pub fn default_message(&self) -> &Map<String, Value> {
        &self.default_message
    }

    /// Build the message for an event: the raw event under `request`, then
    /// the decoded message fields over it.
    ///
    /// `seneca$.msg` may be a notation string or an already-structured
    /// object; when absent (or `null`) the default message is used.
    ///
    /// # Errors
    ///
    /// - [`EventError::NotAnObject`] when the event is not a JSON object
    /// - [`EventError::InvalidMessage`] when `seneca$.msg` is neither a
    ///   string nor an object
    /// - [`EventError::Notation`] when the message string does not decode
    pub fn build_message(&self, event: &Value) -> Result<CanonicalMessage, EventError> {
        let Value::Object(fields) = event else {
            return Err(EventError::NotAnObject {
                kind: json_kind(event),
            });
        };

        let embedded = fields
            .get(ENVELOPE_FIELD)
            .and_then(|envelope| envelope.get(MESSAGE_FIELD))
            .filter(|msg| !msg.is_null());

        let mut message = CanonicalMessage::new();
        message.insert(REQUEST_FIELD.to_string(), event.clone());
        match embedded {
            Some(Value::String(source)) => message.extend(&decode_notation(source)?),
            Some(Value::Object(decoded)) => message.extend(decoded),
            Some(other) => {
                return Err(EventError::InvalidMessage {
                    kind: json_kind(other),
                });
            }
            None => {
                debug!("Event carries no message; using default");
                message.extend(&self.default_message);
            }
        }

        Ok(message)
    }

    /// Decode the event, dispatch it, and return the dispatch result
    /// unchanged.
    #[instrument(skip_all, fields(invocation_id = %context.invocation_id))]
    pub async fn handle(
        &self,
        event: &Value,
        context: &InvocationContext,
        dispatcher: &dyn Dispatcher,
    ) -> Result<DispatchResult, EventError> {
        let message = self.build_message(event)?;
        let result = dispatcher
            .dispatch(message, SideChannel::for_event(event, context))
            .await;

        info!(error = result.is_error(), "Event dispatched");
        Ok(result)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
