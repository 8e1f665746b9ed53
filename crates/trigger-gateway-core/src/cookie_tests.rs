//! Tests for cookie serialization.

use super::*;
use chrono::TimeZone;
use serde_json::json;

#[test]
fn test_auth_defaults_serialize_in_attribute_order() {
    let cookie = serialize_cookie("seneca-auth", "TOKEN", &CookieAttributes::auth_defaults());
    assert_eq!(
        cookie,
        "seneca-auth=TOKEN; Path=/; HttpOnly; Secure; SameSite=None"
    );
}

#[test]
fn test_value_is_percent_encoded() {
    let cookie = serialize_cookie("t", "a b;c=d/é", &CookieAttributes::default());
    assert_eq!(cookie, "t=a%20b%3Bc%3Dd%2F%C3%A9");
}

#[test]
fn test_value_encoding_keeps_uri_component_marks() {
    let cookie = serialize_cookie("t", "it's (a)*!~_.-%21", &CookieAttributes::default());
    assert_eq!(cookie, "t=it's%20(a)*!~_.-%2521");
}

#[test]
fn test_all_attributes_are_rendered() {
    let attributes = CookieAttributes {
        max_age: Some(3600),
        domain: Some("example.com".to_string()),
        path: Some("/api".to_string()),
        expires: Some(Utc.with_ymd_and_hms(2030, 5, 6, 7, 8, 9).unwrap()),
        http_only: Some(true),
        secure: Some(false),
        same_site: Some(SameSite::Lax),
    };

    assert_eq!(
        serialize_cookie("sid", "v", &attributes),
        "sid=v; Max-Age=3600; Domain=example.com; Path=/api; \
         Expires=Mon, 06 May 2030 07:08:09 GMT; HttpOnly; SameSite=Lax"
    );
}

#[test]
fn test_overrides_win_and_unset_fields_fall_back() {
    let overrides = CookieAttributes {
        max_age: Some(60),
        same_site: Some(SameSite::Strict),
        http_only: Some(false),
        ..CookieAttributes::default()
    };

    let merged = CookieAttributes::auth_defaults().merged_with(&overrides);

    assert_eq!(merged.max_age, Some(60));
    assert_eq!(merged.same_site, Some(SameSite::Strict));
    assert_eq!(merged.http_only, Some(false));
    assert_eq!(merged.path.as_deref(), Some("/"));
    assert_eq!(merged.secure, Some(true));
}

#[test]
fn test_expired_cookie_uses_epoch() {
    assert_eq!(
        expired_cookie("seneca-auth"),
        "seneca-auth=NONE; path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT"
    );
}

#[test]
fn test_attributes_deserialize_from_camel_case_json() {
    let attributes: CookieAttributes = serde_json::from_value(json!({
        "maxAge": 10,
        "httpOnly": true,
        "sameSite": "lax",
    }))
    .expect("valid attributes");

    assert_eq!(attributes.max_age, Some(10));
    assert_eq!(attributes.http_only, Some(true));
    assert_eq!(attributes.same_site, Some(SameSite::Lax));
    assert_eq!(attributes.path, None);
}

#[test]
fn test_same_site_accepts_true_and_rejects_unknown() {
    let strict: SameSite = serde_json::from_value(json!(true)).expect("true is Strict");
    assert_eq!(strict, SameSite::Strict);

    let none: SameSite = serde_json::from_value(json!("None")).expect("case-insensitive");
    assert_eq!(none, SameSite::None);

    assert!(serde_json::from_value::<SameSite>(json!("sometimes")).is_err());
    assert!(serde_json::from_value::<SameSite>(json!(false)).is_err());
}
