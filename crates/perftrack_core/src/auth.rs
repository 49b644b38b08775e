//! Stored-credential encoding and verification.
//!
//! # Responsibility
//! - Encode submitted passwords into salted one-way credentials.
//! - Verify submitted passwords against stored credentials.
//!
//! # Invariants
//! - Plaintext passwords are never persisted; only `v1$<salt>$<digest>`
//!   encodings reach storage.
//! - Verification compares digests in constant time.
//! - A credential that does not parse verifies as false, never as an error.

use rand::RngCore;
use sha2::{Digest, Sha256};

const CREDENTIAL_VERSION: &str = "v1";
const SALT_LEN: usize = 16;

/// Encodes a submitted password into an opaque stored credential.
///
/// The result has the shape `v1$<salt-hex>$<sha256-hex>` with a fresh
/// random salt per call.
pub fn encode_credential(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!(
        "{CREDENTIAL_VERSION}${}${}",
        hex::encode(salt),
        hex::encode(digest)
    )
}

/// Checks a submitted password against a stored credential.
///
/// Returns `false` for wrong passwords and for malformed or
/// unknown-version credentials alike.
pub fn verify_credential(stored: &str, password: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let version = parts.next();
    let salt_hex = parts.next();
    let digest_hex = parts.next();

    let (salt_hex, digest_hex) = match (version, salt_hex, digest_hex) {
        (Some(CREDENTIAL_VERSION), Some(salt), Some(digest)) => (salt, digest),
        _ => return false,
    };

    let salt = match hex::decode(salt_hex) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let expected = match hex::decode(digest_hex) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    constant_time_eq(&expected, &salted_digest(&salt, password))
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (lhs, rhs) in a.iter().zip(b.iter()) {
        diff |= lhs ^ rhs;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::{encode_credential, verify_credential, CREDENTIAL_VERSION};

    #[test]
    fn correct_password_verifies() {
        let stored = encode_credential("hunter2");
        assert!(verify_credential(&stored, "hunter2"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let stored = encode_credential("hunter2");
        assert!(!verify_credential(&stored, "hunter3"));
        assert!(!verify_credential(&stored, ""));
    }

    #[test]
    fn encoding_never_contains_plaintext() {
        let stored = encode_credential("topsecret");
        assert!(!stored.contains("topsecret"));
        assert!(stored.starts_with(CREDENTIAL_VERSION));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = encode_credential("repeat");
        let second = encode_credential("repeat");
        assert_ne!(first, second);
        assert!(verify_credential(&first, "repeat"));
        assert!(verify_credential(&second, "repeat"));
    }

    #[test]
    fn malformed_credentials_verify_false() {
        assert!(!verify_credential("", "anything"));
        assert!(!verify_credential("v1$deadbeef", "anything"));
        assert!(!verify_credential("v0$aa$bb", "anything"));
        assert!(!verify_credential("v1$not-hex$not-hex", "anything"));
    }
}
