//! AES-128-CBC parameter cipher, authenticated with HMAC-SHA256

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cbc::cipher::block_padding::Pkcs7;
use cbc::{Decryptor, Encryptor};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use super::ParamCipher;
use crate::error::ZaloError;
use crate::types::SecretKey;

type Aes128CbcEncryptor = Encryptor<Aes128>;
type Aes128CbcDecryptor = Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

const BLOCK_LEN: usize = 16;
const TAG_LEN: usize = 32;

/// Label for deriving the MAC key from the session key.
pub const MAC_KEY_LABEL: &[u8] = b"zpw-param-mac";

/// AES-128-CBC with PKCS#7 padding, encrypt-then-MAC.
///
/// Wire format: `base64(iv || ciphertext || tag)`.
/// - `iv` is 16 fresh bytes from the OS random source.
/// - The AES key is the session secret key as-is.
/// - `tag` is HMAC-SHA256 over `iv || ciphertext`. Its key is
///   `HMAC-SHA256(session key, MAC_KEY_LABEL)`.
///
/// The tag is checked in constant time before any unpadding, so a wrong key
/// or a tampered body is always an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCbcCipher;

impl AesCbcCipher {
    pub fn new() -> Self {
        Self
    }
}

fn mac_key(key: &SecretKey) -> Result<Vec<u8>, ZaloError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| ZaloError::Encryption(format!("Invalid MAC key: {}", e)))?;
    mac.update(MAC_KEY_LABEL);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn keyed_mac(key: &SecretKey, iv: &[u8], ciphertext: &[u8]) -> Result<HmacSha256, ZaloError> {
    let mut mac = HmacSha256::new_from_slice(&mac_key(key)?)
        .map_err(|e| ZaloError::Encryption(format!("Invalid MAC key: {}", e)))?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac)
}

impl ParamCipher for AesCbcCipher {
    fn name(&self) -> &'static str {
        "aes-128-cbc-hmac-sha256"
    }

    fn encrypt_bytes(&self, key: &SecretKey, plaintext: &[u8]) -> Result<String, ZaloError> {
        let mut iv = [0u8; BLOCK_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| ZaloError::Encryption(format!("IV generation failed: {}", e)))?;

        // Room for a full padding block when the input is block-aligned
        let msg_len = plaintext.len();
        let mut buffer = vec![0u8; msg_len + BLOCK_LEN - msg_len % BLOCK_LEN];
        buffer[..msg_len].copy_from_slice(plaintext);

        let encryptor = Aes128CbcEncryptor::new(key.as_bytes().into(), (&iv).into());
        let ciphertext = encryptor
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg_len)
            .map_err(|e| ZaloError::Encryption(format!("Padding failed: {:?}", e)))?;

        let tag = keyed_mac(key, &iv, ciphertext)?.finalize().into_bytes();

        let mut out = Vec::with_capacity(BLOCK_LEN + ciphertext.len() + TAG_LEN);
        out.extend_from_slice(&iv);
        out.extend_from_slice(ciphertext);
        out.extend_from_slice(&tag);
        Ok(BASE64.encode(out))
    }

    fn decrypt_bytes(&self, key: &SecretKey, ciphertext: &str) -> Result<Vec<u8>, ZaloError> {
        let data = BASE64
            .decode(ciphertext.trim())
            .map_err(|e| ZaloError::Decryption(format!("Invalid base64: {}", e)))?;

        // iv, at least one block, tag
        let body_len = data.len().saturating_sub(BLOCK_LEN + TAG_LEN);
        if body_len == 0 || body_len % BLOCK_LEN != 0 {
            return Err(ZaloError::Decryption(format!(
                "Invalid ciphertext length: {}",
                data.len()
            )));
        }

        let (iv, rest) = data.split_at(BLOCK_LEN);
        let (body, tag) = rest.split_at(body_len);

        keyed_mac(key, iv, body)
            .map_err(|e| ZaloError::Decryption(e.message()))?
            .verify_slice(tag)
            .map_err(|_| ZaloError::Decryption("MAC mismatch".to_string()))?;

        let decryptor = Aes128CbcDecryptor::new(key.as_bytes().into(), iv.into());
        let mut buffer = body.to_vec();
        let plaintext = decryptor
            .decrypt_padded_mut::<Pkcs7>(&mut buffer)
            .map_err(|e| ZaloError::Decryption(format!("Bad padding: {:?}", e)))?;

        Ok(plaintext.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretKey {
        SecretKey::from_bytes(b"1234567890123456").unwrap()
    }

    #[test]
    fn test_roundtrip_block_aligned_input() {
        let cipher = AesCbcCipher::new();
        let plaintext = b"0123456789abcdef";
        let encrypted = cipher.encrypt_bytes(&key(), plaintext).unwrap();
        // iv + data block + padding block + tag
        assert_eq!(BASE64.decode(&encrypted).unwrap().len(), 16 + 32 + 32);
        assert_eq!(cipher.decrypt_bytes(&key(), &encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_roundtrip_empty_input() {
        let cipher = AesCbcCipher::new();
        let encrypted = cipher.encrypt_bytes(&key(), b"").unwrap();
        assert!(cipher.decrypt_bytes(&key(), &encrypted).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_base64() {
        let err = AesCbcCipher
            .decrypt_bytes(&key(), "not-valid-base64!!!")
            .unwrap_err();
        assert_eq!(err.code(), "decryption_failed");
        assert!(err.message().contains("Invalid base64"));
    }

    #[test]
    fn test_truncated_ciphertext() {
        // iv and tag with no data block
        let err = AesCbcCipher
            .decrypt_bytes(&key(), &BASE64.encode([0u8; 48]))
            .unwrap_err();
        assert!(err.message().contains("Invalid ciphertext length"));
    }

    #[test]
    fn test_tampered_ciphertext_fails_mac() {
        let cipher = AesCbcCipher::new();
        let encrypted = cipher.encrypt_bytes(&key(), b"{\"fid\":\"123\"}").unwrap();

        let mut data = BASE64.decode(&encrypted).unwrap();
        data[BLOCK_LEN] ^= 0x01;
        let err = cipher
            .decrypt_bytes(&key(), &BASE64.encode(&data))
            .unwrap_err();
        assert_eq!(err.code(), "decryption_failed");
        assert_eq!(err.message(), "MAC mismatch");
    }

    #[test]
    fn test_every_wrong_key_is_rejected() {
        let cipher = AesCbcCipher::new();
        let encrypted = cipher
            .encrypt_bytes(&SecretKey::from_bytes(b"sessionkey123456").unwrap(), b"{\"fid\":\"123\"}")
            .unwrap();

        for i in 0..2000u32 {
            let mut bytes = *b"sessionkey123456";
            bytes[12..].copy_from_slice(&i.to_be_bytes());
            bytes[0] = b'w';
            let wrong = SecretKey::from_bytes(&bytes).unwrap();
            let err = cipher.decrypt_bytes(&wrong, &encrypted).unwrap_err();
            assert_eq!(err.code(), "decryption_failed", "wrong key #{i}");
        }
    }
}
