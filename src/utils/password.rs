use bcrypt::{hash, verify};
use tracing::error;

use crate::utils::errors::AppError;

/// bcrypt cost factor for all stored credentials.
pub const HASH_COST: u32 = 12;

/// Hash a plaintext password with a per-call random salt.
///
/// The plaintext is never stored or logged; callers decide when a value
/// has actually changed and needs hashing.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a stored digest.
///
/// Fails closed: a malformed digest or any other bcrypt error is logged
/// and treated as a mismatch rather than surfaced to the caller.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match verify(password, digest) {
        Ok(matches) => matches,
        Err(e) => {
            error!(error = %e, "Password verification error");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "correct-horse-battery-staple";
        let digest = hash_password(password).expect("hashing should succeed");
        assert_ne!(digest, password);
        assert!(verify_password(password, &digest));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("secret1").expect("hashing should succeed");
        assert!(!verify_password("wrong", &digest));
    }

    #[test]
    fn verify_fails_closed_on_malformed_digest() {
        assert!(!verify_password("anything", "not-a-valid-digest"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret1", &first));
        assert!(verify_password("secret1", &second));
    }
}
