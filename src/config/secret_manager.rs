use std::fmt;

/// Custom error type for secret-related failures
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Centralized manager for application secrets.
///
/// The signing secret is a single configured byte string; every token issue
/// and verify call goes through the same value, so a token minted here is
/// always verifiable here (and nowhere else).
pub struct SecretManager {
    secret_key: String,
}

const SECRET_KEY_VAR: &str = "SECRET_KEY";
const SECRET_KEY_MIN_LENGTH: usize = 32;

impl SecretManager {
    /// Initialize the SecretManager by loading and validating all secrets
    ///
    /// # Errors
    /// Returns `SecretError` if the secret is missing or too short. This is
    /// a startup configuration error; callers should treat it as fatal.
    pub fn init() -> Result<Self, SecretError> {
        let secret_key = std::env::var(SECRET_KEY_VAR).map_err(|_| SecretError::Missing {
            secret_name: SECRET_KEY_VAR.to_string(),
        })?;

        if secret_key.len() < SECRET_KEY_MIN_LENGTH {
            return Err(SecretError::InvalidLength {
                secret_name: SECRET_KEY_VAR.to_string(),
                expected: SECRET_KEY_MIN_LENGTH,
                actual: secret_key.len(),
            });
        }

        Ok(Self { secret_key })
    }

    /// Get the token-signing secret
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 1 }}")
    }
}
