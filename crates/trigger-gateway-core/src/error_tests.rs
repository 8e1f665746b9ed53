//! Tests for gateway error classification and rendering.

use super::*;
use serde_json::Value;

fn body_parse_error() -> GatewayError {
    let source = serde_json::from_str::<Value>("{not json").unwrap_err();
    GatewayError::BodyParse(BodyParseError::InvalidJson { source })
}

#[test]
fn test_body_parse_error_is_client_error() {
    let err = body_parse_error();
    assert!(err.is_client_error());
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.name(), "body_parse_error");
}

#[test]
fn test_configuration_error_is_server_error() {
    let err = GatewayError::Configuration(ConfigError::EmptyCookieName);
    assert!(!err.is_client_error());
    assert_eq!(err.status_code(), 500);
}

#[test]
fn test_into_response_carries_default_headers_and_error_body() {
    let config = GatewayConfig::default();
    let response = body_parse_error().into_response(&config);

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.headers.get("Access-Control-Allow-Origin").map(String::as_str),
        Some("*")
    );

    let body: Value = serde_json::from_str(&response.body).expect("body is JSON");
    assert_eq!(body["error$"]["name"], "body_parse_error");
    assert!(body["error$"]["message"]
        .as_str()
        .expect("message is a string")
        .contains("not valid JSON"));
}

#[test]
fn test_notation_error_display_includes_position() {
    let err = NotationError::new(4, "unexpected '}'");
    assert_eq!(err.to_string(), "at position 4: unexpected '}'");
}

#[test]
fn test_config_error_messages_name_the_webhook() {
    let err = ConfigError::TooManyParams {
        index: 2,
        params: 3,
        groups: 1,
    };
    assert_eq!(
        err.to_string(),
        "webhook 2: 3 params configured but pattern has only 1 capture groups"
    );
}
