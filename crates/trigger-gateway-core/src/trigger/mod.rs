//! # Trigger Payloads
//!
//! Inbound HTTP trigger payloads and the shape-detecting adapters that let the
//! rest of the pipeline ignore which hosting runtime produced them.
//!
//! Two payload layouts are accepted by [`TriggerRequest::from_value`]:
//!
//! | Field        | Azure-style           | Lambda-style                                              |
//! |--------------|-----------------------|-----------------------------------------------------------|
//! | location     | `url`                 | `path`                                                    |
//! | method       | `method`              | `httpMethod`                                              |
//! | query        | `query`               | `queryStringParameters`, `multiValueQueryStringParameters` |
//! | path params  | `params`              | `pathParameters`                                          |
//! | body         | materialized value    | string, optionally base64 (`isBase64Encoded`)             |
//!
//! Header and query collections may be plain JSON objects or lists of
//! `[key, value]` entries; see [`FieldCollection`].

pub mod body;
pub mod headers;
pub mod query;

use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Base used to resolve path-only request URLs such as `/api/hook?x=1`
static RELATIVE_URL_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("static base URL is valid"));

// ============================================================================
// Field collections
// ============================================================================

/// A header or query collection in one of the shapes trigger runtimes use.
///
/// Shape detection happens once, in [`FieldCollection::from_value`]; the
/// normalizers then only iterate [`FieldCollection::iter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldCollection {
    /// Plain mapping: `{"Content-Type": "application/json"}`
    Map(Map<String, Value>),

    /// Enumerable key/value pairs: `[["Content-Type", "application/json"]]`
    Entries(Vec<(String, Value)>),
}

impl FieldCollection {
    /// Detect the collection shape of a JSON value.
    ///
    /// Objects become [`FieldCollection::Map`]; arrays become
    /// [`FieldCollection::Entries`], keeping only items that are
    /// `[string, value]` pairs. Any other value is not a recognized shape and
    /// yields `None`, which the normalizers treat as empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::Map(map.clone())),
            Value::Array(items) => Some(Self::Entries(
                items
                    .iter()
                    .filter_map(|item| match item.as_array().map(Vec::as_slice) {
                        Some([Value::String(key), value]) => Some((key.clone(), value.clone())),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Iterate the collection's key/value pairs in their original order
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        match self {
            Self::Map(map) => Box::new(map.iter().map(|(k, v)| (k.as_str(), v))),
            Self::Entries(entries) => Box::new(entries.iter().map(|(k, v)| (k.as_str(), v))),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Map(map) => map.is_empty(),
            Self::Entries(entries) => entries.is_empty(),
        }
    }
}

// ============================================================================
// Request body
// ============================================================================

/// A lazily readable request body: a stream of byte chunks.
pub struct BodyStream(BoxStream<'static, Result<Bytes, std::io::Error>>);

impl BodyStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static,
    {
        Self(stream.boxed())
    }

    /// Build a stream that yields the given chunks in order.
    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        Self::new(futures::stream::iter(chunks.into_iter().map(Ok)))
    }

    pub(crate) fn into_inner(self) -> BoxStream<'static, Result<Bytes, std::io::Error>> {
        self.0
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyStream").finish_non_exhaustive()
    }
}

/// The body of a trigger request, before resolution into JSON.
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body supplied
    #[default]
    Absent,

    /// Body already materialized by the runtime
    Value(Value),

    /// Raw body text, base64-encoded when `base64_encoded` is set
    Text { text: String, base64_encoded: bool },

    /// Body that must be drained and parsed
    Stream(BodyStream),
}

// ============================================================================
// TriggerRequest
// ============================================================================

/// Everything about a trigger request except its body.
///
/// This is the read-only view of the request handed to the dispatcher's
/// side channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestParts {
    /// Full request URL (Azure-style runtimes)
    pub url: Option<String>,

    /// Request path without query string (Lambda-style runtimes)
    pub path: Option<String>,

    pub method: Option<String>,

    pub headers: Option<FieldCollection>,

    pub query: Option<FieldCollection>,

    /// Multi-value query parameters, merged over `query`
    pub multi_value_query: Option<FieldCollection>,

    /// Raw path parameters as provided by the runtime
    pub params: Option<Value>,
}

impl RequestParts {
    /// The path component of the request.
    ///
    /// Taken from the parsed `url` when present, otherwise from `path` (with
    /// any query string removed). Defaults to the empty string.
    pub fn request_path(&self) -> String {
        if let Some(ref raw) = self.url {
            if raw.is_empty() {
                return String::new();
            }
            return match Url::options().base_url(Some(&*RELATIVE_URL_BASE)).parse(raw) {
                Ok(url) => url.path().to_string(),
                Err(e) => {
                    debug!(url = %raw, error = %e, "Request URL could not be parsed; using empty path");
                    String::new()
                }
            };
        }

        match self.path {
            Some(ref path) => path.split('?').next().unwrap_or_default().to_string(),
            None => String::new(),
        }
    }

    /// Whether the request method is exactly `GET`
    pub fn is_get(&self) -> bool {
        self.method.as_deref() == Some("GET")
    }
}

/// One inbound HTTP trigger invocation.
#[derive(Debug, Default)]
pub struct TriggerRequest {
    pub parts: RequestParts,
    pub body: RequestBody,
}

impl TriggerRequest {
    pub fn new(parts: RequestParts, body: RequestBody) -> Self {
        Self { parts, body }
    }

    /// Read a trigger payload delivered as JSON, accepting either runtime
    /// layout. Absent or unrecognized fields default to empty.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            debug!("Trigger payload is not an object; treating every field as absent");
            return Self::default();
        };

        let string_field = |fields: &Map<String, Value>, names: &[&str]| {
            names
                .iter()
                .find_map(|name| fields.get(*name).and_then(Value::as_str))
                .map(String::from)
        };
        let collection_field = |fields: &Map<String, Value>, names: &[&str]| {
            names
                .iter()
                .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
                .and_then(FieldCollection::from_value)
        };

        let parts = RequestParts {
            url: string_field(&fields, &["url"]),
            path: string_field(&fields, &["path"]),
            method: string_field(&fields, &["method", "httpMethod"]),
            headers: collection_field(&fields, &["headers"]),
            query: collection_field(&fields, &["query", "queryStringParameters"]),
            multi_value_query: collection_field(&fields, &["multiValueQueryStringParameters"]),
            params: ["params", "pathParameters"]
                .iter()
                .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
                .cloned(),
        };

        let base64_encoded = fields
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let body = match fields.remove("body") {
            None | Some(Value::Null) => RequestBody::Absent,
            Some(Value::String(text)) => RequestBody::Text {
                text,
                base64_encoded,
            },
            Some(other) => RequestBody::Value(other),
        };

        Self { parts, body }
    }

    pub fn into_parts(self) -> (RequestParts, RequestBody) {
        (self.parts, self.body)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
