//! Webhook route matching through the full gateway

mod common;

use common::{azure_request, context, create_gateway_from_yaml};
use serde_json::json;
use trigger_gateway_core::TriggerRequest;

const HOOK_CONFIG: &str = r#"
webhooks:
  - pattern: 'api/public/hook/([^/]+)/([^/?]+)'
    params: [name, code]
    fixed:
      handle: hook
"#;

#[tokio::test]
async fn test_webhook_round_trip() {
    let (gateway, dispatcher) = create_gateway_from_yaml(HOOK_CONFIG);

    let mut payload = azure_request("POST", "/api/public/hook/foo/bar?y=1", json!({"x": 2}));
    payload["query"] = json!({"y": ["1"]});

    let response = gateway
        .handle(TriggerRequest::from_value(payload), context())
        .await
        .expect("handled");
    assert_eq!(response.status_code, 200);

    let message = dispatcher.single_message();
    assert_eq!(message["name"], json!("foo"));
    assert_eq!(message["code"], json!("bar"));
    assert_eq!(message["handle"], json!("hook"));
    assert_eq!(message["body"], json!({"x": 2}));
    assert_eq!(message["x"], json!(2));
    assert_eq!(message["gateway"]["query"], json!({"y": "1"}));
}

#[tokio::test]
async fn test_first_matching_route_wins() {
    let (gateway, dispatcher) = create_gateway_from_yaml(
        r#"
webhooks:
  - pattern: 'hook/([^/]+)$'
    params: [first]
    fixed:
      route: one
  - pattern: 'hook/([^/]+)$'
    params: [second]
    fixed:
      route: two
"#,
    );

    let request = TriggerRequest::from_value(azure_request("POST", "/hook/abc", json!({})));
    gateway.handle(request, context()).await.expect("handled");

    let message = dispatcher.single_message();
    assert_eq!(message["first"], json!("abc"));
    assert_eq!(message["route"], json!("one"));
    assert!(message.get("second").is_none());
}

#[tokio::test]
async fn test_fixed_fields_win_over_bound_params() {
    let (gateway, dispatcher) = create_gateway_from_yaml(
        r#"
webhooks:
  - pattern: 'svc/([^/]+)'
    params: [handle]
    fixed:
      handle: fixed
"#,
    );

    let request = TriggerRequest::from_value(azure_request("PUT", "/svc/bound", json!({})));
    gateway.handle(request, context()).await.expect("handled");

    assert_eq!(dispatcher.single_message()["handle"], json!("fixed"));
}

#[tokio::test]
async fn test_unmatched_path_leaves_message_alone() {
    let (gateway, dispatcher) = create_gateway_from_yaml(HOOK_CONFIG);

    let request = TriggerRequest::from_value(azure_request("POST", "/elsewhere", json!({"x": 2})));
    gateway.handle(request, context()).await.expect("handled");

    let message = dispatcher.single_message();
    assert!(message.get("name").is_none());
    assert!(message.get("body").is_none());
    assert_eq!(message["x"], json!(2));
}

#[tokio::test]
async fn test_get_requests_skip_webhook_routes() {
    let (gateway, dispatcher) = create_gateway_from_yaml(HOOK_CONFIG);

    let request = TriggerRequest::from_value(azure_request(
        "GET",
        "/api/public/hook/foo/bar",
        serde_json::Value::Null,
    ));
    gateway.handle(request, context()).await.expect("handled");

    let message = dispatcher.single_message();
    // Legacy rule: last two segments, no `body` field
    assert_eq!(message["name"], json!("foo"));
    assert_eq!(message["code"], json!("bar"));
    assert!(message.get("body").is_none());
}
