/// Password hashing and verification using bcrypt
use crate::error::{AuthError, Result};

/// Hash a password with the given work factor. The salt is generated
/// internally, so two hashes of the same password differ.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored hash. A mismatch yields `Ok(false)`;
/// only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AuthError::Internal(format!("password verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps these fast; production uses the configured
    // factor.
    const COST: u32 = 4;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter2hunter2", COST).unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("hunter2hunter2", COST).unwrap();
        assert!(!verify_password("not-the-password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password", COST).unwrap();
        let b = hash_password("same-password", COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-bcrypt-hash").is_err());
    }
}
