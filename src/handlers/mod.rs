// Route handlers, grouped by resource
pub mod actors;
pub mod movies;
pub mod public;

use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a path id. Anything that is not an i32 maps to 404 rather than
/// 400, so `/actors/abc` behaves exactly like an id that does not exist.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::not_found("resource not found"))
}

/// Unwrap a request body. Missing, unparseable, and empty payloads
/// (`null`, `{}`, `[]`, `""`, `0`, `false`) are all treated as absent.
fn require_body(body: Option<Json<Value>>) -> Result<Value, ApiError> {
    let value = body
        .map(|Json(value)| value)
        .ok_or_else(|| ApiError::bad_request("request body is required"))?;

    if is_empty_payload(&value) {
        return Err(ApiError::bad_request("request body is required"));
    }

    Ok(value)
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Read an optional integer field. Values outside i32 range are treated
/// like non-integers: absent.
fn int_field(body: &Value, key: &str) -> Option<i32> {
    body.get(key)
        .and_then(Value::as_i64)
        .and_then(|value| i32::try_from(value).ok())
}

/// Read an optional text field. Blank strings count as absent, on create
/// and update alike.
fn text_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
