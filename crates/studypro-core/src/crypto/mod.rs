//! Cryptographic primitives for encrypted-at-rest storage
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption of string payloads
//! - Argon2id key derivation from the configured passphrase
//! - SHA-256 password digests for credential checks
//! - Secure key memory with zeroize

mod cipher;
mod key_derivation;
mod password;
mod secure_memory;

pub use cipher::{Cipher, EncryptedPayload};
pub use key_derivation::{derive_key, generate_salt, KeyDerivationParams};
pub use password::hash_password;
pub use secure_memory::MasterKey;
