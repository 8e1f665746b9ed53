//! # Dispatch Contract
//!
//! The seam between the adapter and the message dispatch engine. The adapter
//! interprets only three fields of a dispatch result: `out`, `error` and the
//! `gateway$` response directive. Everything else is passed through.

use crate::{
    directive::ResponseDirective, message::CanonicalMessage, response::HttpResponse,
    trigger::RequestParts, InvocationId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Invocation context supplied by the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub invocation_id: InvocationId,

    /// The runtime's own context object, passed through opaquely
    #[serde(default)]
    pub runtime: Value,
}

impl InvocationContext {
    pub fn new(runtime: Value) -> Self {
        Self {
            invocation_id: InvocationId::new(),
            runtime,
        }
    }
}

/// Low-level access for handlers that need more than the message.
///
/// On the HTTP path `response` and `request` are set; on the event path
/// `event` is set instead.
#[derive(Debug)]
pub struct SideChannel<'a> {
    /// The response being built; handlers may adjust it directly
    pub response: Option<&'a mut HttpResponse>,

    /// The HTTP trigger request, minus its already-consumed body
    pub request: Option<&'a RequestParts>,

    /// The raw event payload
    pub event: Option<&'a Value>,

    pub context: &'a InvocationContext,
}

impl<'a> SideChannel<'a> {
    pub fn for_request(
        response: &'a mut HttpResponse,
        request: &'a RequestParts,
        context: &'a InvocationContext,
    ) -> Self {
        Self {
            response: Some(response),
            request: Some(request),
            event: None,
            context,
        }
    }

    pub fn for_event(event: &'a Value, context: &'a InvocationContext) -> Self {
        Self {
            response: None,
            request: None,
            event: Some(event),
            context,
        }
    }
}

/// What the dispatch engine returns for a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Handler payload, serialized into the response body when truthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<Value>,

    /// Set (truthy) when dispatch failed, e.g. no handler matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    /// Response directive steering HTTP-specific behavior
    #[serde(
        rename = "gateway$",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub directive: Option<ResponseDirective>,

    /// Any other fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DispatchResult {
    /// Successful result carrying `out`
    pub fn ok(out: Value) -> Self {
        Self {
            out: Some(out),
            ..Self::default()
        }
    }

    /// Failed result carrying the engine's error payload as `out`
    pub fn failed(error: Value) -> Self {
        Self {
            out: Some(error),
            error: Some(Value::Bool(true)),
            ..Self::default()
        }
    }

    pub fn with_directive(mut self, directive: ResponseDirective) -> Self {
        self.directive = Some(directive);
        self
    }

    /// Whether the engine reported a failure
    pub fn is_error(&self) -> bool {
        self.error.as_ref().is_some_and(crate::is_truthy)
    }
}

/// The message dispatch engine.
///
/// Implementations route a canonical message to a handler and report the
/// outcome in-band through [`DispatchResult`]; the adapter never retries.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(
        &self,
        message: CanonicalMessage,
        side_channel: SideChannel<'_>,
    ) -> DispatchResult;
}
