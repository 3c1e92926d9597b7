use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{InputErrorKind, ZaloError};

/// Key length required by the AES-128 parameter cipher.
pub const SECRET_KEY_LEN: usize = 16;

/// Zalo account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uid(String);

impl Uid {
    pub fn new(id: impl Into<String>) -> Result<Self, ZaloError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ZaloError::invalid_input(
                InputErrorKind::Required,
                "uid",
                "uid must not be empty",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Uid {
    type Error = ZaloError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Uid> for String {
    fn from(value: Uid) -> Self {
        value.0
    }
}

/// Device identifier sent by the web client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Imei(String);

impl Imei {
    pub fn new(imei: impl Into<String>) -> Result<Self, ZaloError> {
        let imei = imei.into();
        if imei.is_empty() {
            return Err(ZaloError::invalid_input(
                InputErrorKind::Required,
                "imei",
                "imei must not be empty",
            ));
        }
        Ok(Self(imei))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Imei {
    type Error = ZaloError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Imei> for String {
    fn from(value: Imei) -> Self {
        value.0
    }
}

/// Per-session symmetric key (`zpw_enk`), stored base64-encoded.
///
/// Always holds exactly [`SECRET_KEY_LEN`] bytes. `Debug` never prints
/// the key material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    /// Decode a base64 secret key.
    pub fn from_base64(encoded: &str) -> Result<Self, ZaloError> {
        let bytes = BASE64.decode(encoded.trim()).map_err(|e| {
            ZaloError::invalid_input(
                InputErrorKind::InvalidValue,
                "secret_key",
                format!("secret_key is not valid base64: {}", e),
            )
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ZaloError> {
        let key: [u8; SECRET_KEY_LEN] = bytes.try_into().map_err(|_| {
            ZaloError::invalid_input(
                InputErrorKind::InvalidValue,
                "secret_key",
                format!(
                    "secret_key must decode to {} bytes, got {}",
                    SECRET_KEY_LEN,
                    bytes.len()
                ),
            )
        })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl TryFrom<String> for SecretKey {
    type Error = ZaloError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base64(&value)
    }
}

impl From<SecretKey> for String {
    fn from(value: SecretKey) -> Self {
        value.to_base64()
    }
}
