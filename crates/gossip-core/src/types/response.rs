//! The response envelope shared by every remote call.
//!
//! The backend answers with `{ "code": 0, "message": "ok", "data": ... }`.
//! Older endpoints still return `{ "users": [...] }`, `{ "results": [...] }`
//! or a bare array; [`decode_list`] accepts all of them so no caller has to
//! inspect shapes on its own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::result::AppResult;

/// Keys under which legacy endpoints nest a list payload.
const LEGACY_LIST_KEYS: &[&str] = &[
    "users",
    "results",
    "connections",
    "chats",
    "messages",
    "items",
];

/// Canonical response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// `0` or an HTTP-style 2xx code on success.
    pub code: i64,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// Payload, absent on errors and on bodiless acknowledgements.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Wrap a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Whether the code reports success.
    pub fn is_success(&self) -> bool {
        is_success_code(self.code)
    }
}

fn is_success_code(code: i64) -> bool {
    code == 0 || (200..300).contains(&code)
}

/// Fail when `body` is an envelope carrying an error code.
fn check_envelope(body: &Value) -> AppResult<()> {
    let Some(code) = body.get("code").and_then(Value::as_i64) else {
        return Ok(());
    };
    if is_success_code(code) {
        return Ok(());
    }
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    Err(AppError::external_service(format!("{message} (code {code})")))
}

/// Decode a list payload from any supported response shape.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> AppResult<Vec<T>> {
    check_envelope(&body)?;
    match body {
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                return match data {
                    Value::Null => Ok(Vec::new()),
                    other => decode_list(other),
                };
            }
            for key in LEGACY_LIST_KEYS {
                if let Some(list) = map.remove(*key) {
                    return Ok(serde_json::from_value(list)?);
                }
            }
            Err(AppError::serialization(
                "response does not contain a recognizable list",
            ))
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(AppError::serialization("expected a list payload")),
    }
}

/// Decode a single object from an envelope or a bare body.
pub fn decode_item<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    check_envelope(&body)?;
    match body {
        Value::Object(mut map) if map.contains_key("code") && map.contains_key("data") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            Ok(serde_json::from_value(data)?)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    fn ids(rows: Vec<Row>) -> Vec<String> {
        rows.into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn accepts_every_list_shape() {
        let shapes = [
            json!([{ "id": "1" }]),
            json!({ "users": [{ "id": "1" }] }),
            json!({ "results": [{ "id": "1" }] }),
            json!({ "code": 0, "message": "ok", "data": [{ "id": "1" }] }),
            json!({ "code": 200, "data": { "users": [{ "id": "1" }] } }),
        ];
        for shape in shapes {
            let rows: Vec<Row> = decode_list(shape.clone()).unwrap();
            assert_eq!(ids(rows), vec!["1"], "shape {shape}");
        }
    }

    #[test]
    fn error_envelope_surfaces_message() {
        let err = decode_list::<Row>(json!({ "code": 40001, "message": "bad query" })).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::ExternalService);
        assert!(err.message.contains("bad query"));
    }

    #[test]
    fn null_data_is_empty_list() {
        let rows: Vec<Row> = decode_list(json!({ "code": 0, "data": null })).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn unknown_object_is_rejected() {
        let err = decode_list::<Row>(json!({ "what": 1 })).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Serialization);
    }

    #[test]
    fn item_from_envelope_or_bare_body() {
        let wrapped: Row = decode_item(json!({ "code": 0, "data": { "id": "9" } })).unwrap();
        let bare: Row = decode_item(json!({ "id": "9" })).unwrap();
        assert_eq!(wrapped, bare);
    }
}
