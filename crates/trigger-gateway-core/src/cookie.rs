//! `Set-Cookie` header serialization for the auth token cookie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Write as _;

/// Date layout used by the `Expires` attribute (RFC 7231 IMF-fixdate)
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Attributes attached to a serialized cookie.
///
/// Every field is optional so that a directive can override just the
/// attributes it cares about; see [`CookieAttributes::merged_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieAttributes {
    /// Lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl CookieAttributes {
    /// Attributes applied to the auth cookie unless configured otherwise:
    /// `Path=/; HttpOnly; Secure; SameSite=None`.
    pub fn auth_defaults() -> Self {
        Self {
            path: Some("/".to_string()),
            http_only: Some(true),
            secure: Some(true),
            same_site: Some(SameSite::None),
            ..Self::default()
        }
    }

    /// Return these attributes with every attribute set in `overrides`
    /// replacing the corresponding value here.
    pub fn merged_with(&self, overrides: &CookieAttributes) -> CookieAttributes {
        CookieAttributes {
            max_age: overrides.max_age.or(self.max_age),
            domain: overrides.domain.clone().or_else(|| self.domain.clone()),
            path: overrides.path.clone().or_else(|| self.path.clone()),
            expires: overrides.expires.or(self.expires),
            http_only: overrides.http_only.or(self.http_only),
            secure: overrides.secure.or(self.secure),
            same_site: overrides.same_site.or(self.same_site),
        }
    }
}

/// `SameSite` cookie attribute.
///
/// Accepts `"strict"`, `"lax"`, `"none"` in any letter case, or `true` as a
/// shorthand for `Strict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl Serialize for SameSite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SameSite {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Strict),
            Raw::Flag(false) => Err(serde::de::Error::custom(
                "sameSite must be true or one of strict, lax, none",
            )),
            Raw::Name(name) => match name.to_ascii_lowercase().as_str() {
                "strict" => Ok(Self::Strict),
                "lax" => Ok(Self::Lax),
                "none" => Ok(Self::None),
                other => Err(serde::de::Error::custom(format!(
                    "unknown sameSite value '{}'",
                    other
                ))),
            },
        }
    }
}

/// Serialize a cookie as a `Set-Cookie` header value:
/// `name=value; Max-Age=..; Domain=..; Path=..; Expires=..; HttpOnly; Secure; SameSite=..`.
///
/// The value is percent-encoded the same way `encodeURIComponent` does.
pub fn serialize_cookie(name: &str, value: &str, attributes: &CookieAttributes) -> String {
    let mut cookie = format!("{}={}", name, encode_uri_component(value));

    if let Some(max_age) = attributes.max_age {
        let _ = write!(cookie, "; Max-Age={}", max_age);
    }
    if let Some(ref domain) = attributes.domain {
        let _ = write!(cookie, "; Domain={}", domain);
    }
    if let Some(ref path) = attributes.path {
        let _ = write!(cookie, "; Path={}", path);
    }
    if let Some(expires) = attributes.expires {
        let _ = write!(cookie, "; Expires={}", expires.format(HTTP_DATE_FORMAT));
    }
    if attributes.http_only == Some(true) {
        cookie.push_str("; HttpOnly");
    }
    if attributes.secure == Some(true) {
        cookie.push_str("; Secure");
    }
    if let Some(same_site) = attributes.same_site {
        let _ = write!(cookie, "; SameSite={}", same_site.as_str());
    }

    cookie
}

/// `Set-Cookie` value that removes the named cookie: the value is replaced
/// with `NONE` and the expiry set to the Unix epoch on the root path.
pub fn expired_cookie(name: &str) -> String {
    format!(
        "{}=NONE; path=/; expires={}",
        name,
        DateTime::<Utc>::UNIX_EPOCH.format(HTTP_DATE_FORMAT)
    )
}

/// Percent-encode a cookie value the way `encodeURIComponent` does: on top
/// of the unreserved set, `!*'()` are left as they are.
fn encode_uri_component(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%2A", "*")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}

#[cfg(test)]
#[path = "cookie_tests.rs"]
mod tests;
