//! Conversions between Value and serde types.

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use propath_core::{Error, Value};

/// Convert a Value to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, Error> {
    // Go through serde_json::Value, then deserialize
    let json = to_json(value)?;
    serde_json::from_value(json).map_err(|e| {
        log::debug!("decoding {} failed: {}", value.type_name(), e);
        Error::custom(format!("decode error: {}", e))
    })
}

/// Convert a Rust type to a Value via serde.
pub fn to_value<T: Serialize>(data: &T) -> Result<Value, Error> {
    let json =
        serde_json::to_value(data).map_err(|e| Error::custom(format!("encode error: {}", e)))?;
    Ok(from_json(json))
}

/// Parse a JSON document into a Value.
pub fn parse_json(text: &str) -> Result<Value, Error> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::custom(format!("invalid JSON: {}", e)))?;
    Ok(from_json(json))
}

/// Convert our Value to serde_json::Value.
///
/// Pointers are flattened to their pointee (`null` when empty) and records
/// become objects of their public members. Host objects have no JSON form.
pub fn to_json(value: &Value) -> Result<serde_json::Value, Error> {
    Ok(match value {
        Value::Null | Value::Pointer(None) => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => {
            // JSON doesn't have bytes, so we base64 encode
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_, _>>()?)
        }
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), to_json(v)?)))
                .collect::<Result<_, Error>>()?,
        ),
        Value::Pointer(Some(cell)) => to_json(cell)?,
        Value::Record(record) => serde_json::Value::Object(
            record
                .fields()
                .map(|(k, v)| Ok((k.to_string(), to_json(v)?)))
                .collect::<Result<_, Error>>()?,
        ),
        Value::Object(_) => {
            return Err(Error::custom(format!(
                "{} has no JSON representation",
                value.type_name()
            )))
        }
    })
}

/// Convert serde_json::Value to our Value.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                // Fallback for very large numbers
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => {
            Value::Map(map.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}
