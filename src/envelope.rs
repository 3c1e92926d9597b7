//! Response envelope decoding
//!
//! A reply body is encrypted under the session key. Once decrypted it is a
//! JSON object that either reports a failure through an error indicator
//! (`error_code` / `errorCode` / `error`) or is the success payload.
//!
//! The payload is returned as-is, in server key order and with every key
//! casing preserved. Renaming fields is left to each endpoint
//! (see [`crate::api::transform`]).

use serde_json::{Map, Value};

use crate::crypto::{self, AesCbcCipher, ParamCipher};
use crate::error::ZaloError;
use crate::types::{RawResponse, SecretKey};

/// Decoded success payload.
pub type Payload = Map<String, Value>;

const ERROR_CODE_KEYS: [&str; 2] = ["error_code", "errorCode"];
const ERROR_FLAG_KEY: &str = "error";
const ERROR_MESSAGE_KEYS: [&str; 3] = ["error_message", "errorMessage", "message"];

/// Message used when the server flags an error without describing it.
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown API error";

/// Code reported for a bare `"error": true` indicator.
pub const GENERIC_ERROR_CODE: i64 = -1;

/// Decode a raw reply with the default cipher.
pub fn parse(raw: &RawResponse, secret_key: &SecretKey) -> Result<Payload, ZaloError> {
    parse_with(raw, secret_key, &AesCbcCipher)
}

/// Decode a raw reply with the given cipher.
///
/// # Errors
/// - [`ZaloError::HttpStatus`] for a non-2xx status unless the body decodes
///   to an API error
/// - [`ZaloError::Decryption`] when a 2xx body cannot be decrypted into JSON
/// - [`ZaloError::Api`] when the error indicator is set
/// - [`ZaloError::InvalidResponse`] when the document is not a JSON object
pub fn parse_with(
    raw: &RawResponse,
    secret_key: &SecretKey,
    cipher: &dyn ParamCipher,
) -> Result<Payload, ZaloError> {
    let status = raw.status.as_u16();

    let document = match decode_body(&raw.body, secret_key, cipher) {
        Ok(document) => document,
        Err(_) if !raw.is_success() => return Err(ZaloError::HttpStatus { status }),
        Err(e) => return Err(e),
    };

    let Value::Object(payload) = document else {
        if !raw.is_success() {
            return Err(ZaloError::HttpStatus { status });
        }
        return Err(ZaloError::InvalidResponse(
            "decrypted body is not a JSON object".to_string(),
        ));
    };

    if let Some(code) = error_indicator(&payload) {
        let message = ERROR_MESSAGE_KEYS
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_str))
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE);
        return Err(ZaloError::Api {
            code,
            message: message.to_string(),
        });
    }

    if !raw.is_success() {
        return Err(ZaloError::HttpStatus { status });
    }

    Ok(payload)
}

fn decode_body(
    body: &str,
    secret_key: &SecretKey,
    cipher: &dyn ParamCipher,
) -> Result<Value, ZaloError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ZaloError::Decryption("empty response body".to_string()));
    }
    let plaintext = crypto::decrypt_with(cipher, secret_key, body)?;
    serde_json::from_slice(&plaintext)
        .map_err(|e| ZaloError::Decryption(format!("decrypted body is not JSON: {}", e)))
}

/// Non-zero remote error code, if the payload reports a failure.
fn error_indicator(payload: &Payload) -> Option<i64> {
    for key in ERROR_CODE_KEYS {
        if let Some(code) = payload.get(key).and_then(as_code) {
            if code != 0 {
                return Some(code);
            }
        }
    }

    match payload.get(ERROR_FLAG_KEY) {
        Some(Value::Bool(true)) => Some(GENERIC_ERROR_CODE),
        Some(value) => as_code(value).filter(|code| *code != 0),
        None => None,
    }
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(float_code)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(float_code)
            })
        }
        _ => None,
    }
}

/// Only an exact zero means success; anything else stays non-zero.
fn float_code(f: f64) -> i64 {
    if f == 0.0 {
        0
    } else if f.trunc() == 0.0 {
        GENERIC_ERROR_CODE
    } else {
        // saturates past the i64 range
        f as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;
    use http::StatusCode;
    use serde_json::json;

    fn key() -> SecretKey {
        SecretKey::from_bytes(b"1234567890123456").unwrap()
    }

    fn encrypted(value: Value) -> String {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        crypto::encrypt(&key(), &map).unwrap()
    }

    fn reply(status: u16, body: impl Into<String>) -> RawResponse {
        RawResponse::new(StatusCode::from_u16(status).unwrap(), body)
    }

    #[test]
    fn test_success_payload_is_returned_unchanged() {
        let body = encrypted(json!({"error_code": 0, "data": {"groupName": "A", "group_id": "1"}}));
        let payload = parse(&reply(200, body), &key()).unwrap();
        assert_eq!(payload["data"]["groupName"], "A");
        assert_eq!(payload["data"]["group_id"], "1");
    }

    #[test]
    fn test_error_code_maps_to_api_error() {
        let body = encrypted(json!({"error_code": 114, "error_message": "Conversation not found"}));
        let err = parse(&reply(200, body), &key()).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Api);
        assert_eq!(err.api_code(), Some(114));
        assert_eq!(err.message(), "Conversation not found");
    }

    #[test]
    fn test_camel_case_indicator() {
        let body = encrypted(json!({"errorCode": "216", "errorMessage": "Blocked"}));
        let err = parse(&reply(200, body), &key()).unwrap_err();
        assert_eq!(err.api_code(), Some(216));
        assert_eq!(err.message(), "Blocked");
    }

    #[test]
    fn test_error_flag_without_message() {
        let body = encrypted(json!({"error": true}));
        let err = parse(&reply(200, body), &key()).unwrap_err();
        assert_eq!(err.api_code(), Some(GENERIC_ERROR_CODE));
        assert_eq!(err.message(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_float_and_out_of_range_codes_are_errors() {
        for (code, expected) in [
            (json!(1.0), 1),
            (json!(0.5), GENERIC_ERROR_CODE),
            (json!(u64::MAX), i64::MAX),
            (json!("114.0"), 114),
        ] {
            let body = encrypted(json!({"error_code": code.clone(), "error_message": "x"}));
            let err = parse(&reply(200, body), &key()).unwrap_err();
            assert_eq!(err.api_code(), Some(expected), "code {code}");
        }
    }

    #[test]
    fn test_zero_float_code_is_success() {
        let body = encrypted(json!({"error_code": 0.0, "data": 1}));
        assert!(parse(&reply(200, body), &key()).is_ok());
    }

    #[test]
    fn test_error_false_is_success() {
        let body = encrypted(json!({"error": false, "data": 1}));
        assert!(parse(&reply(200, body), &key()).is_ok());
    }

    #[test]
    fn test_non_2xx_without_body_is_http_error() {
        let err = parse(&reply(502, ""), &key()).unwrap_err();
        assert_eq!(err.code(), "http_error");
        assert!(err.message().contains("502"));
    }

    #[test]
    fn test_non_2xx_with_plain_text_body_is_http_error() {
        let err = parse(&reply(404, "Not Found"), &key()).unwrap_err();
        assert!(matches!(err, ZaloError::HttpStatus { status: 404 }));
    }

    #[test]
    fn test_non_2xx_with_api_error_body_prefers_api_error() {
        let body = encrypted(json!({"error_code": 403, "error_message": "Forbidden"}));
        let err = parse(&reply(403, body), &key()).unwrap_err();
        assert_eq!(err.api_code(), Some(403));
    }

    #[test]
    fn test_garbage_body_is_decryption_error() {
        let err = parse(&reply(200, "%%%not-base64%%%"), &key()).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Security);
        assert_eq!(err.code(), "decryption_failed");
    }

    #[test]
    fn test_non_object_document_is_invalid_response() {
        let ciphertext = AesCbcCipher.encrypt_bytes(&key(), b"[1,2,3]").unwrap();
        let err = parse(&reply(200, ciphertext), &key()).unwrap_err();
        assert_eq!(err.code(), "invalid_response");
    }
}
