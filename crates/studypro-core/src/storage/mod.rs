//! Encrypting key-value storage
//!
//! Values are encrypted transparently on write and decrypted on read; keys
//! are opaque strings. The file backend persists the whole entry map as one
//! JSON document written atomically.

mod encrypted_file;
mod traits;

pub use encrypted_file::EncryptedFileStorage;
pub use traits::SecureStorage;
