//! Decoding of raw response bodies.
//!
//! Several endpoints return their JSON wrapped inside a JSON string, so a body
//! may need to be decoded twice before it yields rows. Error envelopes come
//! back unwrapped as a plain object carrying `message` or `errorMessage`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;

/// Decodes a response body, unwrapping string-encoded JSON until a
/// non-string value remains, and turns error envelopes into [`Error::Upstream`].
pub fn decode_payload(body: &str) -> Result<Value, Error> {
    let mut value: Value =
        serde_json::from_str(body).map_err(|e| Error::Malformed(e.to_string()))?;
    loop {
        let inner = match &value {
            Value::String(text) => serde_json::from_str::<Value>(text)
                .map_err(|e| Error::Malformed(format!("string payload is not JSON: {}", e)))?,
            _ => break,
        };
        value = inner;
    }
    if let Some(message) = error_message(&value) {
        return Err(Error::Upstream { message });
    }
    Ok(value)
}

/// Returns the embedded message when `value` is an error envelope.
pub fn error_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let raw = object.get("message").or_else(|| object.get("errorMessage"))?;
    Some(match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Deserializes a decoded payload into typed records.
pub fn decode_records<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, Error> {
    serde_json::from_value(payload).map_err(|e| Error::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_array_decodes_once() {
        let value = decode_payload(r#"[{"a": 1}]"#).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn string_wrapped_array_decodes_twice() {
        let body = serde_json::to_string(&json!([{"a": 1}]).to_string()).unwrap();
        let value = decode_payload(&body).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn envelope_with_message_is_upstream_error() {
        let err = decode_payload(r#"{"message": "Internal server error"}"#).unwrap_err();
        match err {
            Error::Upstream { message } => assert_eq!(message, "Internal server error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn envelope_with_error_message_is_upstream_error() {
        let err = decode_payload(r#"{"errorMessage": "Task timed out"}"#).unwrap_err();
        assert!(matches!(err, Error::Upstream { message } if message == "Task timed out"));
    }

    #[test]
    fn non_json_body_is_malformed() {
        assert!(matches!(
            decode_payload("<html>oops</html>"),
            Err(Error::Malformed(_))
        ));
    }
}
