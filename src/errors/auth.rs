use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::types::dto::common::ErrorResponse;

/// Authentication and account error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Malformed user input (bad email, weak password, invalid username)
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Email address already registered
    #[oai(status = 400)]
    DuplicateEmail(Json<ErrorResponse>),

    /// Username already taken
    #[oai(status = 400)]
    DuplicateUsername(Json<ErrorResponse>),

    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Invalid, tampered or expired email-link token. One message for all
    /// three cases so the response leaks nothing to an attacker.
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Login access token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Account email not yet confirmed
    #[oai(status = 403)]
    UnconfirmedAccount(Json<ErrorResponse>),

    /// Role does not grant the required permission
    #[oai(status = 403)]
    PermissionDenied(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    /// Create a Validation error with a caller-supplied message
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email() -> Self {
        AuthError::DuplicateEmail(Json(ErrorResponse {
            error: "duplicate_email".to_string(),
            message: "Email already registered".to_string(),
            status_code: 400,
        }))
    }

    /// Create a DuplicateUsername error
    pub fn duplicate_username() -> Self {
        AuthError::DuplicateUsername(Json(ErrorResponse {
            error: "duplicate_username".to_string(),
            message: "Username already in use".to_string(),
            status_code: 400,
        }))
    }

    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "The link is invalid or has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "Access token has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create an UnconfirmedAccount error
    pub fn unconfirmed_account() -> Self {
        AuthError::UnconfirmedAccount(Json(ErrorResponse {
            error: "unconfirmed_account".to_string(),
            message: "Please confirm your account first".to_string(),
            status_code: 403,
        }))
    }

    /// Create a PermissionDenied error
    pub fn permission_denied() -> Self {
        AuthError::PermissionDenied(Json(ErrorResponse {
            error: "permission_denied".to_string(),
            message: "Insufficient permissions".to_string(),
            status_code: 403,
        }))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        AuthError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::Validation(json) => json.0.message.clone(),
            AuthError::DuplicateEmail(json) => json.0.message.clone(),
            AuthError::DuplicateUsername(json) => json.0.message.clone(),
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::InvalidToken(json) => json.0.message.clone(),
            AuthError::ExpiredToken(json) => json.0.message.clone(),
            AuthError::UnconfirmedAccount(json) => json.0.message.clone(),
            AuthError::PermissionDenied(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
