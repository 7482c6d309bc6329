//! AES-256-GCM cipher wrapper
//!
//! Payload wire format: `{iv_hex}:{auth_tag_hex}:{ciphertext_hex}`
//! - IV: 12 bytes (96 bits) - standard for GCM
//! - Auth tag: 16 bytes (128 bits)
//! - Ciphertext: variable length

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use std::str::FromStr;

use super::MasterKey;
use crate::error::{CoreError, Result};

/// An encrypted payload with IV and auth tag
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    /// Initialization vector (12 bytes for GCM)
    pub iv: [u8; 12],
    /// Authentication tag (16 bytes)
    pub auth_tag: [u8; 16],
    /// Encrypted ciphertext
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.iv),
            hex::encode(self.auth_tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedPayload {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(CoreError::DecryptionError(
                "Invalid payload format: expected iv:tag:ciphertext".to_string(),
            ));
        }

        let iv_bytes = hex::decode(parts[0])
            .map_err(|e| CoreError::DecryptionError(format!("Invalid IV hex: {}", e)))?;
        let auth_tag_bytes = hex::decode(parts[1])
            .map_err(|e| CoreError::DecryptionError(format!("Invalid auth tag hex: {}", e)))?;
        let ciphertext = hex::decode(parts[2])
            .map_err(|e| CoreError::DecryptionError(format!("Invalid ciphertext hex: {}", e)))?;

        let iv: [u8; 12] = iv_bytes.as_slice().try_into().map_err(|_| {
            CoreError::DecryptionError(format!("Invalid IV length: {}", iv_bytes.len()))
        })?;
        let auth_tag: [u8; 16] = auth_tag_bytes.as_slice().try_into().map_err(|_| {
            CoreError::DecryptionError(format!(
                "Invalid auth tag length: {}",
                auth_tag_bytes.len()
            ))
        })?;

        Ok(Self {
            iv,
            auth_tag,
            ciphertext,
        })
    }
}

/// Symmetric cipher over a single process-wide key
///
/// Constructed once per process from the configured passphrase; all stored
/// data in this install is encrypted under the same key.
pub struct Cipher {
    key: MasterKey,
}

impl Cipher {
    /// Create a cipher over the given key
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    fn aead(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|e| CoreError::EncryptionError(e.to_string()))
    }

    /// Encrypt a string payload, returning the serialized
    /// `iv:tag:ciphertext` form
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = self.aead()?;

        // Random IV per payload (12 bytes for GCM)
        let mut iv = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        // aes-gcm appends the auth tag to the ciphertext
        let ciphertext_with_tag = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CoreError::EncryptionError(e.to_string()))?;

        if ciphertext_with_tag.len() < 16 {
            return Err(CoreError::EncryptionError(
                "Ciphertext too short".to_string(),
            ));
        }

        let tag_start = ciphertext_with_tag.len() - 16;
        let ciphertext = ciphertext_with_tag[..tag_start].to_vec();
        let mut auth_tag = [0u8; 16];
        auth_tag.copy_from_slice(&ciphertext_with_tag[tag_start..]);

        Ok(EncryptedPayload {
            iv,
            auth_tag,
            ciphertext,
        }
        .to_string())
    }

    /// Decrypt a serialized payload back to the plaintext string
    ///
    /// Fails with [`CoreError::DecryptionError`] when the payload is
    /// malformed or was produced under a different key.
    pub fn decrypt(&self, payload: &str) -> Result<String> {
        let payload = EncryptedPayload::from_str(payload)?;
        let cipher = self.aead()?;

        let nonce = Nonce::from_slice(&payload.iv);

        // Reconstruct ciphertext with tag appended (as expected by aes-gcm)
        let mut ciphertext_with_tag = payload.ciphertext;
        ciphertext_with_tag.extend_from_slice(&payload.auth_tag);

        let plaintext = cipher
            .decrypt(nonce, ciphertext_with_tag.as_slice())
            .map_err(|e| CoreError::DecryptionError(e.to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| CoreError::DecryptionError(format!("Invalid UTF-8: {}", e)))
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").field("key", &"[REDACTED]").finish()
    }
}
