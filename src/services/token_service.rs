use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::AuthError;
use crate::types::internal::auth::{AccessClaims, EmailTokenClaims};

/// Issues and verifies the signed, time-limited tokens used by the service:
/// short-lived login access tokens and the single-purpose tokens embedded in
/// confirmation, password-reset and email-change links.
///
/// Tokens are HS256 JWTs, so they are URL-safe opaque strings and the
/// signature check (delegated to `jsonwebtoken`) is constant-time.
///
/// Expiry boundary: a token is still accepted at the exact expiry instant
/// (`now == exp`) and rejected strictly after it; leeway is zero.
pub struct TokenService {
    secret_key: String,
    access_ttl_secs: i64,
    email_token_ttl_secs: i64,
}

impl TokenService {
    /// Create a new TokenService signing with `secret_key`.
    ///
    /// `email_token_ttl_secs` bounds the validity of confirmation, reset and
    /// email-change links. Access tokens are fixed at 15 minutes.
    pub fn new(secret_key: String, email_token_ttl_secs: i64) -> Self {
        Self {
            secret_key,
            access_ttl_secs: 15 * 60,
            email_token_ttl_secs,
        }
    }

    /// Number of seconds a freshly issued access token stays valid
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Generate a login access token for the given user id
    pub fn generate_access_token(&self, user_id: i32) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = AccessClaims {
            sub: user_id.to_string(),
            exp: now + self.access_ttl_secs,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate access token: {}", e)))
    }

    /// Validate a login access token and return its claims
    ///
    /// Unlike the email-link tokens, an expired access token is reported as
    /// such: the client needs to know when to log in again.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let token_data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &self.validation(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::expired_token(),
            _ => AuthError::invalid_token(),
        })?;

        Ok(token_data.claims)
    }

    /// Generate an account-confirmation token carrying `{confirm: user_id}`
    pub fn generate_confirmation_token(&self, user_id: i32) -> Result<String, AuthError> {
        self.issue_email_token(EmailTokenClaims {
            confirm: Some(user_id),
            ..Default::default()
        })
    }

    /// Verify a confirmation token and return the embedded user id
    pub fn verify_confirmation_token(&self, token: &str) -> Result<i32, AuthError> {
        let claims = self.verify_email_token(token)?;
        claims.confirm.ok_or_else(AuthError::invalid_token)
    }

    /// Generate a password-reset token carrying `{reset: user_id}`
    pub fn generate_reset_token(&self, user_id: i32) -> Result<String, AuthError> {
        self.issue_email_token(EmailTokenClaims {
            reset: Some(user_id),
            ..Default::default()
        })
    }

    /// Verify a password-reset token and return the embedded user id
    pub fn verify_reset_token(&self, token: &str) -> Result<i32, AuthError> {
        let claims = self.verify_email_token(token)?;
        claims.reset.ok_or_else(AuthError::invalid_token)
    }

    /// Generate an email-change token carrying
    /// `{change_email: user_id, new_email}`
    pub fn generate_email_change_token(
        &self,
        user_id: i32,
        new_email: &str,
    ) -> Result<String, AuthError> {
        self.issue_email_token(EmailTokenClaims {
            change_email: Some(user_id),
            new_email: Some(new_email.to_string()),
            ..Default::default()
        })
    }

    /// Verify an email-change token and return `(user_id, new_email)`
    pub fn verify_email_change_token(&self, token: &str) -> Result<(i32, String), AuthError> {
        let claims = self.verify_email_token(token)?;
        match (claims.change_email, claims.new_email) {
            (Some(user_id), Some(new_email)) => Ok((user_id, new_email)),
            _ => Err(AuthError::invalid_token()),
        }
    }

    fn issue_email_token(&self, mut claims: EmailTokenClaims) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        claims.iat = now;
        claims.exp = now + self.email_token_ttl_secs;

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate token: {}", e)))
    }

    /// Every failure mode - bad signature, malformed payload, expiry -
    /// collapses into the same InvalidToken so callers cannot tell (and
    /// cannot leak) which one occurred.
    fn verify_email_token(&self, token: &str) -> Result<EmailTokenClaims, AuthError> {
        let token_data = decode::<EmailTokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &self.validation(),
        )
        .map_err(|_| AuthError::invalid_token())?;

        Ok(token_data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret_key", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("email_token_ttl_secs", &self.email_token_ttl_secs)
            .finish()
    }
}
