//! Query parameter normalization.
//!
//! Some runtimes wrap every query value in a one-element list even when the
//! parameter appears once. Normalized query maps never contain such
//! singleton lists: `{"y": ["1"]}` becomes `{"y": "1"}`, while lists of any
//! other length are kept as they are.

use super::FieldCollection;
use serde_json::{Map, Value};

/// Build a query map from the single-value collection and, when the runtime
/// supplies one, the multi-value collection merged over it; then collapse
/// singleton lists into scalars.
pub fn normalize_query(
    query: Option<&FieldCollection>,
    multi_value_query: Option<&FieldCollection>,
) -> Map<String, Value> {
    let mut normalized = Map::new();
    for collection in [query, multi_value_query].into_iter().flatten() {
        for (name, value) in collection.iter() {
            normalized.insert(name.to_string(), value.clone());
        }
    }

    for value in normalized.values_mut() {
        let single = match value {
            Value::Array(items) if items.len() == 1 => items.pop(),
            _ => None,
        };
        if let Some(single) = single {
            *value = single;
        }
    }

    normalized
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
