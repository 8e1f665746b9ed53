//! The HTTP response returned to the hosting trigger runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status code every response starts with
pub const DEFAULT_STATUS: u16 = 200;

/// Body every response starts with, before the dispatch result is known
pub const EMPTY_BODY: &str = "{}";

/// Outbound HTTP response in the shape trigger runtimes expect
/// (`{"statusCode", "headers", "body"}`).
///
/// Header names are stored exactly as configured or set; the response is
/// built once per invocation and mutated in place by the directive stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    /// Create a `200` response with an empty JSON object body and the given
    /// default headers.
    pub fn with_headers(headers: BTreeMap<String, String>) -> Self {
        Self {
            status_code: DEFAULT_STATUS,
            headers,
            body: EMPTY_BODY.to_string(),
        }
    }

    /// Get a header by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Set a header, replacing any previous value under the same name
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::with_headers(BTreeMap::new())
    }
}
