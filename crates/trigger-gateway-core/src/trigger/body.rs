//! Body resolution.
//!
//! Turns any [`RequestBody`] into a JSON value. Materialized values are used
//! as they are; text is parsed (after base64 decoding when flagged); streams
//! are drained chunk by chunk and then parsed. A missing, empty, or `null`
//! body resolves to an empty object.

use super::RequestBody;
use crate::error::BodyParseError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Resolve a request body into a JSON value.
///
/// Draining a [`RequestBody::Stream`] is the only suspension point in
/// request normalization; chunks are read sequentially until the stream ends.
///
/// # Errors
///
/// - [`BodyParseError::Stream`] when the stream yields an I/O error
/// - [`BodyParseError::Base64`] when base64-flagged text does not decode
/// - [`BodyParseError::InvalidJson`] when text or stream content is not JSON
#[instrument(skip(body))]
pub async fn resolve_body(body: RequestBody) -> Result<Value, BodyParseError> {
    let resolved = match body {
        RequestBody::Absent => Value::Null,
        RequestBody::Value(value) => value,
        RequestBody::Text {
            text,
            base64_encoded,
        } => {
            if base64_encoded {
                let bytes = STANDARD
                    .decode(text.as_bytes())
                    .map_err(|e| BodyParseError::Base64 {
                        message: e.to_string(),
                    })?;
                parse_json_bytes(&bytes)?
            } else {
                parse_json_bytes(text.as_bytes())?
            }
        }
        RequestBody::Stream(stream) => {
            let mut stream = stream.into_inner();
            let mut buffer = Vec::new();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| BodyParseError::Stream {
                    message: e.to_string(),
                })?;
                buffer.extend_from_slice(&chunk);
            }
            debug!(size_bytes = buffer.len(), "Drained request body stream");
            parse_json_bytes(&buffer)?
        }
    };

    Ok(match resolved {
        Value::Null => Value::Object(Map::new()),
        other => other,
    })
}

fn parse_json_bytes(bytes: &[u8]) -> Result<Value, BodyParseError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|source| BodyParseError::InvalidJson { source })
}

#[cfg(test)]
#[path = "body_tests.rs"]
mod tests;
