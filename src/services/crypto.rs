use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::errors::AuthError;

/// Hash a plaintext password with Argon2id and a fresh random salt
///
/// The plaintext is write-only: callers hash it once and only ever store or
/// pass around the PHC-format hash string.
///
/// # Returns
/// * `Ok(String)` - The PHC-format hash
/// * `Err(AuthError)` - Hashing failed
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal_error(format!("Password hashing error: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against a stored PHC-format hash
///
/// # Returns
/// * `Ok(())` - Password matches
/// * `Err(AuthError)` - InvalidCredentials on mismatch or malformed hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|_| AuthError::invalid_credentials())?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::invalid_credentials())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_the_plaintext() {
        let hash = hash_password("cat").unwrap();
        assert_ne!(hash, "cat");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_accepts_correct_password() {
        let hash = hash_password("cat").unwrap();
        assert!(verify_password("cat", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("cat").unwrap();
        let result = verify_password("dog", &hash);
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_salts_are_random() {
        // Same password, two hashes, different salts
        let hash1 = hash_password("cat").unwrap();
        let hash2 = hash_password("cat").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let result = verify_password("cat", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }
}
