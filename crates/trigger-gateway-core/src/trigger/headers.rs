//! Header normalization.

use super::FieldCollection;
use serde_json::{Map, Value};

/// Lower-case every header name, preserving values.
///
/// Accepts either collection shape; absent input yields an empty map. When
/// two names collide after lower-casing, the later one wins.
pub fn normalize_headers(headers: Option<&FieldCollection>) -> Map<String, Value> {
    let mut normalized = Map::new();
    if let Some(headers) = headers {
        for (name, value) in headers.iter() {
            normalized.insert(name.to_lowercase(), value.clone());
        }
    }
    normalized
}

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;
