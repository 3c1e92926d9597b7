//! Parameter encryption for the Zalo web API
//!
//! Request parameters are serialized to JSON and encrypted under the
//! session's secret key; response bodies come back encrypted under the same
//! key.
//!
//! The concrete construction sits behind the [`ParamCipher`] trait so it can
//! be swapped once checked against real server traffic. [`AesCbcCipher`] is
//! the default.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zalo_web_sdk::crypto;
//!
//! let mut params = serde_json::Map::new();
//! params.insert("fid".into(), "123".into());
//!
//! let encrypted = crypto::encrypt(session.secret_key(), &params)?;
//! let plaintext = crypto::decrypt(session.secret_key(), &encrypted)?;
//! ```

pub mod aes;

pub use aes::AesCbcCipher;

use serde_json::{Map, Value};

use crate::error::ZaloError;
use crate::types::SecretKey;

/// Symmetric cipher used for request parameters and response bodies.
///
/// Implementations must generate a fresh IV/nonce for every
/// [`encrypt_bytes`](ParamCipher::encrypt_bytes) call.
/// [`decrypt_bytes`](ParamCipher::decrypt_bytes) must return an error, never
/// a panic or unauthenticated bytes, for malformed input or a wrong key.
pub trait ParamCipher: Send + Sync {
    /// Short identifier for logging.
    fn name(&self) -> &'static str;

    /// Encrypt raw bytes into the opaque wire string.
    fn encrypt_bytes(&self, key: &SecretKey, plaintext: &[u8]) -> Result<String, ZaloError>;

    /// Reverse of [`encrypt_bytes`](ParamCipher::encrypt_bytes).
    fn decrypt_bytes(&self, key: &SecretKey, ciphertext: &str) -> Result<Vec<u8>, ZaloError>;
}

/// Serialize `params` (keeping its key order) and encrypt it with the
/// default cipher.
pub fn encrypt(secret_key: &SecretKey, params: &Map<String, Value>) -> Result<String, ZaloError> {
    encrypt_with(&AesCbcCipher, secret_key, params)
}

pub fn encrypt_with(
    cipher: &dyn ParamCipher,
    secret_key: &SecretKey,
    params: &Map<String, Value>,
) -> Result<String, ZaloError> {
    let plaintext = serde_json::to_vec(params)
        .map_err(|e| ZaloError::Encryption(format!("Cannot serialize params: {}", e)))?;
    cipher.encrypt_bytes(secret_key, &plaintext)
}

/// Decrypt a ciphertext produced by [`encrypt`] (or by the server).
pub fn decrypt(secret_key: &SecretKey, ciphertext: &str) -> Result<Vec<u8>, ZaloError> {
    decrypt_with(&AesCbcCipher, secret_key, ciphertext)
}

pub fn decrypt_with(
    cipher: &dyn ParamCipher,
    secret_key: &SecretKey,
    ciphertext: &str,
) -> Result<Vec<u8>, ZaloError> {
    cipher.decrypt_bytes(secret_key, ciphertext)
}

/// Like [`decrypt`], but also requires UTF-8 plaintext.
pub fn decrypt_to_string(secret_key: &SecretKey, ciphertext: &str) -> Result<String, ZaloError> {
    let bytes = decrypt(secret_key, ciphertext)?;
    String::from_utf8(bytes).map_err(|e| ZaloError::Decryption(format!("Invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> SecretKey {
        SecretKey::from_bytes(b"sessionkey123456").unwrap()
    }

    fn params() -> Map<String, Value> {
        match json!({"zsource": 101, "fid": "123", "imei": "device-1", "nested": {"a": [1, 2]}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip_keeps_key_order() {
        let encrypted = encrypt(&key(), &params()).unwrap();
        let plaintext = decrypt_to_string(&key(), &encrypted).unwrap();
        assert_eq!(
            plaintext,
            r#"{"zsource":101,"fid":"123","imei":"device-1","nested":{"a":[1,2]}}"#
        );
    }

    #[test]
    fn test_encrypt_uses_fresh_iv() {
        let a = encrypt(&key(), &params()).unwrap();
        let b = encrypt(&key(), &params()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_is_decryption_error() {
        let encrypted = encrypt(&key(), &params()).unwrap();
        let other = SecretKey::from_bytes(b"anotherkey123456").unwrap();
        let err = decrypt(&other, &encrypted).unwrap_err();
        assert_eq!(err.code(), "decryption_failed");
        assert_eq!(err.category(), crate::error::ErrorCategory::Security);
    }

    #[test]
    fn test_decrypt_with_uses_given_cipher() {
        struct Plain;

        impl ParamCipher for Plain {
            fn name(&self) -> &'static str {
                "plain"
            }

            fn encrypt_bytes(&self, _key: &SecretKey, plaintext: &[u8]) -> Result<String, ZaloError> {
                Ok(String::from_utf8_lossy(plaintext).into_owned())
            }

            fn decrypt_bytes(&self, _key: &SecretKey, ciphertext: &str) -> Result<Vec<u8>, ZaloError> {
                Ok(ciphertext.as_bytes().to_vec())
            }
        }

        let encrypted = encrypt_with(&Plain, &key(), &params()).unwrap();
        let plaintext = decrypt_with(&Plain, &key(), &encrypted).unwrap();
        assert_eq!(plaintext, serde_json::to_vec(&params()).unwrap());
        assert!(decrypt(&key(), &encrypted).is_err());
    }
}
