//! Tests for the trigger-gateway-core library module.

use super::*;
use serde_json::json;

#[test]
fn test_invocation_ids_are_unique() {
    let first = InvocationId::new();
    let second = InvocationId::new();

    assert_ne!(first, second);
    assert_eq!(first.to_string().len(), 26);
}

#[test]
fn test_invocation_id_serializes_as_ulid_string() {
    let id = InvocationId::new();
    let value = serde_json::to_value(id).expect("serializable");
    assert_eq!(value, json!(id.to_string()));
}

#[test]
fn test_truthiness_follows_javascript_rules() {
    assert!(!is_truthy(&json!(null)));
    assert!(!is_truthy(&json!(false)));
    assert!(!is_truthy(&json!(0)));
    assert!(!is_truthy(&json!(0.0)));
    assert!(!is_truthy(&json!("")));

    assert!(is_truthy(&json!(true)));
    assert!(is_truthy(&json!(201)));
    assert!(is_truthy(&json!("x")));
    assert!(is_truthy(&json!([])));
    assert!(is_truthy(&json!({})));
}
