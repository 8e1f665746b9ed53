//! Common test utilities for trigger-gateway integration tests
//!
//! This module provides:
//! - A mock [`Dispatcher`] that records every call
//! - Builders for trigger payloads in each runtime layout

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use trigger_gateway_core::{
    CanonicalMessage, DispatchResult, Dispatcher, GatewayConfig, InvocationContext, SideChannel,
    TriggerGateway,
};

// ============================================================================
// Mock Dispatcher
// ============================================================================

/// What the dispatcher saw for one call
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedDispatch {
    pub message: Value,
    pub had_response: bool,
    pub request_path: Option<String>,
    pub event: Option<Value>,
    pub invocation_id: String,
}

type Responder = Box<dyn Fn(&Value) -> DispatchResult + Send + Sync>;

/// Mock dispatch engine; replies through a configurable responder
#[derive(Clone)]
#[allow(dead_code)]
pub struct MockDispatcher {
    calls: Arc<Mutex<Vec<RecordedDispatch>>>,
    responder: Arc<Mutex<Responder>>,
}

impl MockDispatcher {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(Mutex::new(Box::new(|_| DispatchResult::default()))),
        }
    }

    #[allow(dead_code)]
    pub fn set_result(&self, result: DispatchResult) {
        *self.responder.lock().unwrap() = Box::new(move |_| result.clone());
    }

    /// Reply based on the dispatched message
    #[allow(dead_code)]
    pub fn set_responder<F>(&self, responder: F)
    where
        F: Fn(&Value) -> DispatchResult + Send + Sync + 'static,
    {
        *self.responder.lock().unwrap() = Box::new(responder);
    }

    #[allow(dead_code)]
    pub fn get_calls(&self) -> Vec<RecordedDispatch> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The message of the only call made
    #[allow(dead_code)]
    pub fn single_message(&self) -> Value {
        let calls = self.get_calls();
        assert_eq!(calls.len(), 1, "expected exactly one dispatch");
        calls[0].message.clone()
    }
}

#[async_trait::async_trait]
impl Dispatcher for MockDispatcher {
    async fn dispatch(
        &self,
        message: CanonicalMessage,
        side_channel: SideChannel<'_>,
    ) -> DispatchResult {
        let message = message.into_value();
        let result = {
            let responder = self.responder.lock().unwrap();
            (*responder)(&message)
        };

        self.calls.lock().unwrap().push(RecordedDispatch {
            message,
            had_response: side_channel.response.is_some(),
            request_path: side_channel.request.map(|r| r.request_path()),
            event: side_channel.event.cloned(),
            invocation_id: side_channel.context.invocation_id.to_string(),
        });

        result
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Gateway over `config` with a fresh mock dispatcher
#[allow(dead_code)]
pub fn create_gateway(config: GatewayConfig) -> (TriggerGateway, MockDispatcher) {
    let dispatcher = MockDispatcher::new();
    let gateway =
        TriggerGateway::new(config, Arc::new(dispatcher.clone())).expect("valid gateway config");
    (gateway, dispatcher)
}

/// Gateway with configuration parsed from YAML
#[allow(dead_code)]
pub fn create_gateway_from_yaml(yaml: &str) -> (TriggerGateway, MockDispatcher) {
    create_gateway(GatewayConfig::from_yaml_str(yaml).expect("valid YAML config"))
}

/// Azure-style HTTP trigger payload
#[allow(dead_code)]
pub fn azure_request(method: &str, url: &str, body: Value) -> Value {
    json!({
        "method": method,
        "url": url,
        "headers": {"Content-Type": "application/json"},
        "query": {},
        "params": {},
        "body": body,
    })
}

/// Lambda-style HTTP trigger payload with a text body
#[allow(dead_code)]
pub fn lambda_request(method: &str, path: &str, body: &str) -> Value {
    json!({
        "httpMethod": method,
        "path": path,
        "headers": {"Content-Type": "application/json"},
        "queryStringParameters": null,
        "multiValueQueryStringParameters": null,
        "pathParameters": null,
        "isBase64Encoded": false,
        "body": body,
    })
}

#[allow(dead_code)]
pub fn context() -> InvocationContext {
    InvocationContext::new(json!({"functionName": "gateway"}))
}
