//! Password digests for credential checks

use sha2::{Digest, Sha256};

/// Hash a password to a hex SHA-256 digest.
///
/// Deterministic and unsalted: login verifies credentials by recomputing the
/// digest and comparing for equality. Not suitable as a general-purpose
/// password verifier.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
